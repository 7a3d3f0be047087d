//! Name-keyed shape registry.
//!
//! The library owns the generator table; consumers only ever ask for
//! "the cloud for `name` with `count` points".  Generators can be added or
//! replaced at runtime.

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;

use crate::point::Point3;
use crate::shapes;

/// A boxed point-cloud generator: `(count, rng) -> exactly count points`.
pub type Generator = Box<dyn Fn(usize, &mut StdRng) -> Vec<Point3> + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeError {
    UnknownShape(String),
    /// A generator returned the wrong number of points.
    CountMismatch { expected: usize, got: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::UnknownShape(name) => write!(f, "unknown shape \"{}\"", name),
            ShapeError::CountMismatch { expected, got } =>
                write!(f, "shape produced {} points, expected {}", got, expected),
        }
    }
}

impl std::error::Error for ShapeError {}

pub struct ShapeLibrary {
    generators: BTreeMap<String, Generator>,
}

impl fmt::Debug for ShapeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeLibrary").field("shapes", &self.names()).finish()
    }
}

impl Default for ShapeLibrary {
    fn default() -> Self { ShapeLibrary::with_builtins() }
}

impl ShapeLibrary {
    pub fn empty() -> Self {
        ShapeLibrary { generators: BTreeMap::new() }
    }

    /// All built-in shapes (see [`crate::shapes`]).
    pub fn with_builtins() -> Self {
        let builtins: [(&str, fn(usize, &mut StdRng) -> Vec<Point3>); 16] = [
            ("sphere",    shapes::sphere),
            ("heart",     shapes::heart),
            ("flower",    shapes::flower),
            ("sun",       shapes::sun),
            ("saturn",    shapes::saturn),
            ("torus",     shapes::torus),
            ("helix",     shapes::helix),
            ("dna",       shapes::dna),
            ("galaxy",    shapes::galaxy),
            ("cube",      shapes::cube),
            ("ring",      shapes::ring),
            ("wave",      shapes::wave),
            ("vortex",    shapes::vortex),
            ("star",      shapes::star),
            ("lamp",      shapes::lamp),
            ("fireworks", shapes::fireworks),
        ];
        let generators = builtins
            .into_iter()
            .map(|(name, g)| (name.to_string(), Box::new(g) as Generator))
            .collect();
        ShapeLibrary { generators }
    }

    /// Add a generator, replacing any existing one with the same name.
    /// Returns `true` if a generator was replaced.
    pub fn register<F>(&mut self, name: &str, generator: F) -> bool
    where
        F: Fn(usize, &mut StdRng) -> Vec<Point3> + Send + Sync + 'static,
    {
        let replaced = self.generators.insert(name.to_string(), Box::new(generator)).is_some();
        if replaced {
            log::info!("shape \"{}\" replaced", name);
        } else {
            log::info!("shape \"{}\" registered", name);
        }
        replaced
    }

    /// Shape names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.generators.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    pub fn len(&self) -> usize { self.generators.len() }

    pub fn is_empty(&self) -> bool { self.generators.is_empty() }

    /// Generate `count` points for `name`.
    pub fn generate(&self, name: &str, count: usize, rng: &mut StdRng) -> Result<Vec<Point3>, ShapeError> {
        let generator = self
            .generators
            .get(name)
            .ok_or_else(|| ShapeError::UnknownShape(name.to_string()))?;
        let points = generator(count, rng);
        if points.len() != count {
            return Err(ShapeError::CountMismatch { expected: count, got: points.len() });
        }
        Ok(points)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
