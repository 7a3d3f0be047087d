//! `ParticleEngine`: one call per rendered frame.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use hand_signal::{HandFrame, Point2};
use particle_shapes::{Point3, ShapeError, ShapeLibrary};

use crate::blend::{BlendError, ParticleField};
use crate::color::Rgb;
use crate::control::{ControlSettings, InteractionState, Rotation3};

/// What an observer (HUD, renderer) needs from one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub target_offset:     Point2,
    pub global_scale:      f32,
    pub explosion:         f32,
    pub rotation:          Rotation3,
    pub is_auto_rotating:  bool,
    pub is_control_active: bool,
    pub is_pinch_locked:   bool,
}

/// Interaction state, rotation settings and the particle field, driven
/// together.
#[derive(Debug)]
pub struct ParticleEngine {
    state:    InteractionState,
    settings: ControlSettings,
    field:    ParticleField,
    shape:    Option<String>,
}

impl ParticleEngine {
    pub fn new(count: usize, settings: ControlSettings) -> Self {
        ParticleEngine::with_rng(count, settings, StdRng::from_entropy())
    }

    pub fn with_rng(count: usize, settings: ControlSettings, rng: StdRng) -> Self {
        ParticleEngine {
            state: InteractionState::new(),
            settings,
            field: ParticleField::new(count, rng),
            shape: None,
        }
    }

    /// Run the state machine and the blend for one frame.
    pub fn process_frame(&mut self, frame: &HandFrame, dt: f32) -> FrameOutput {
        let (next, params) = self.state.step(frame, &self.settings, dt);
        self.state = next;
        self.field.advance(&params, dt);
        FrameOutput {
            target_offset:     params.target_offset,
            global_scale:      params.global_scale,
            explosion:         params.explosion,
            rotation:          params.rotation,
            is_auto_rotating:  next.is_auto_rotating,
            is_control_active: next.is_control_active,
            is_pinch_locked:   next.is_pinch_locked,
        }
    }

    /// Make `points` the target of shape `name`.  Returns `Ok(false)` when
    /// `name` is already active, leaving the target untouched.  The first
    /// shape places the particles directly on their targets.
    pub fn switch_shape(&mut self, name: &str, points: Vec<Point3>) -> Result<bool, BlendError> {
        if self.shape.as_deref() == Some(name) {
            return Ok(false);
        }
        if let Err(e) = self.field.set_target(points) {
            log::warn!("shape \"{}\" rejected: {}", name, e);
            return Err(e);
        }
        if self.shape.is_none() {
            self.field.snap_to_target();
        }
        log::info!("shape switched to \"{}\"", name);
        self.shape = Some(name.to_string());
        Ok(true)
    }

    /// Generate `name` from `library` at this engine's particle count and
    /// switch to it.
    pub fn switch_shape_from(&mut self, library: &ShapeLibrary, name: &str) -> Result<bool, ShapeError> {
        if self.shape.as_deref() == Some(name) {
            return Ok(false);
        }
        let count = self.field.len();
        let points = library.generate(name, count, self.field.rng_mut()).map_err(|e| {
            log::warn!("shape \"{}\" rejected: {}", name, e);
            e
        })?;
        self.switch_shape(name, points).map_err(|e| match e {
            BlendError::CountMismatch { expected, got } => ShapeError::CountMismatch { expected, got },
        })
    }

    pub fn current_shape(&self) -> Option<&str> { self.shape.as_deref() }

    pub fn len(&self) -> usize { self.field.len() }

    pub fn is_empty(&self) -> bool { self.field.is_empty() }

    pub fn positions(&self) -> &[Point3] { self.field.positions() }

    pub fn colors(&self) -> &[Rgb] { self.field.colors() }

    pub fn target(&self) -> &[Point3] { self.field.target() }

    pub fn state(&self) -> &InteractionState { &self.state }

    // ── Rotation controls ────────────────────────────────────────────────

    pub fn settings(&self) -> &ControlSettings { &self.settings }

    pub fn set_idle_speed(&mut self, speed: f32) {
        self.settings.idle_speed = speed;
    }

    pub fn set_manual_rotation(&mut self, x: f32, y: f32) {
        self.settings.manual_x = x;
        self.settings.manual_y = y;
    }

    /// Zero the manual offsets and the spin accumulator.
    pub fn reset_rotation(&mut self) {
        self.settings.manual_x = 0.0;
        self.settings.manual_y = 0.0;
        self.state.reset_rotation();
        log::info!("rotation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(count: usize) -> ParticleEngine {
        ParticleEngine::with_rng(count, ControlSettings::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn same_name_is_noop() {
        let mut e = engine(3);
        assert_eq!(e.switch_shape("a", vec![Point3::new(1.0, 0.0, 0.0); 3]), Ok(true));
        assert_eq!(e.switch_shape("a", vec![Point3::new(9.0, 0.0, 0.0); 3]), Ok(false));
        assert_eq!(e.target()[0], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn first_shape_starts_in_place_later_ones_blend() {
        let mut e = engine(3);
        e.switch_shape("a", vec![Point3::new(1.0, 2.0, 3.0); 3]).unwrap();
        assert_eq!(e.positions(), e.target());
        e.switch_shape("b", vec![Point3::new(-4.0, 0.0, 0.0); 3]).unwrap();
        assert_eq!(e.positions()[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bad_switch_keeps_previous_shape() {
        let mut e = engine(3);
        e.switch_shape("a", vec![Point3::ZERO; 3]).unwrap();
        assert!(e.switch_shape("b", vec![Point3::ZERO; 2]).is_err());
        assert_eq!(e.current_shape(), Some("a"));
    }

    #[test]
    fn switch_from_library() {
        let lib = ShapeLibrary::with_builtins();
        let mut e = engine(100);
        assert_eq!(e.switch_shape_from(&lib, "sphere"), Ok(true));
        assert!(e.target().iter().all(|p| (p.length() - 2.0).abs() < 1e-4));
        assert_eq!(
            e.switch_shape_from(&lib, "teapot"),
            Err(ShapeError::UnknownShape("teapot".to_string()))
        );
        assert_eq!(e.current_shape(), Some("sphere"));
    }

    #[test]
    fn reset_zeroes_manual_and_spin() {
        let mut e = engine(1);
        e.set_manual_rotation(0.5, 1.0);
        for _ in 0..30 {
            e.process_frame(&HandFrame::empty(), 1.0 / 60.0);
        }
        e.reset_rotation();
        assert_eq!(e.settings().manual_x, 0.0);
        assert_eq!(e.settings().manual_y, 0.0);
        assert_eq!(e.state().rotation_accumulator, 0.0);
        let out = e.process_frame(&HandFrame::empty(), 1.0 / 60.0);
        assert!(out.rotation.y < 0.001);
    }
}
