//! # particle_shapes
//!
//! Target point clouds for the particle field.  Each shape is a pure
//! generator `(count, rng) -> Vec<Point3>`; the [`ShapeLibrary`] keys them by
//! name and checks that every cloud has exactly the requested size.
//!
//! ## Quick start
//!
//! ```rust
//! use particle_shapes::ShapeLibrary;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let library = ShapeLibrary::with_builtins();
//! let mut rng = StdRng::seed_from_u64(1);
//! let cloud = library.generate("torus", 1000, &mut rng).unwrap();
//! assert_eq!(cloud.len(), 1000);
//! ```

pub mod point;
pub mod shapes;
pub mod library;

pub use point::Point3;
pub use library::{Generator, ShapeError, ShapeLibrary};
