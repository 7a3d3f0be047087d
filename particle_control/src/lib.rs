//! # particle_control
//!
//! Turns per-frame [`hand_signal::HandFrame`]s into smooth particle motion.
//!
//! ```text
//!  HandFrame ──► InteractionState::step ──► ControlParams ──► ParticleField::advance
//!                 (latches, locks, spin)    (offset, scale,    (blend, colour)
//!                                            explosion, rot)
//! ```
//!
//! | Module      | Role                                                   |
//! |-------------|--------------------------------------------------------|
//! | [`control`] | activation / lock / auto-rotate state machine          |
//! | [`blend`]   | per-particle effective target and exponential blending |
//! | [`damping`] | frame-rate-independent smoothing factors               |
//! | [`color`]   | HSL particle colouring                                 |
//! | [`engine`]  | [`ParticleEngine`] facade: frames in, buffers out      |
//!
//! ## Quick start
//!
//! ```rust
//! use hand_signal::HandFrame;
//! use particle_control::{ControlSettings, ParticleEngine};
//! use particle_shapes::ShapeLibrary;
//!
//! let library = ShapeLibrary::with_builtins();
//! let mut engine = ParticleEngine::new(500, ControlSettings::default());
//! engine.switch_shape_from(&library, "flower").unwrap();
//! let out = engine.process_frame(&HandFrame::empty(), 1.0 / 60.0);
//! assert!(!out.is_control_active);
//! assert_eq!(engine.positions().len(), 500);
//! ```

pub mod damping;
pub mod color;
pub mod control;
pub mod blend;
pub mod engine;

pub use color::Rgb;
pub use control::{ControlParams, ControlSettings, InteractionState, Rotation3};
pub use blend::{BlendError, ParticleField};
pub use engine::{FrameOutput, ParticleEngine};
