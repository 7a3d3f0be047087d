//! Target Blending Engine.
//!
//! Every frame, each particle's effective target is built from its base
//! target and the frame's [`ControlParams`]:
//!
//! ```text
//! base × scale ─► + explosion·dir + jitter ─► + offset ─► + ambient wobble
//! ```
//!
//! and the rendered position moves toward it by `1 − e^(−λΔt)`.  The base
//! targets are only ever replaced wholesale, never modified in place.

use std::fmt;

use rand::rngs::StdRng;
use rand::Rng;

use particle_shapes::Point3;

use crate::color::{particle_color, Rgb};
use crate::control::ControlParams;
use crate::damping::{safe_dt, smoothing_factor, SMOOTHING_RATE};

/// Explosions at or below this are ignored.
pub const EXPLOSION_FLOOR: f32 = 0.01;
/// Random scatter per unit of explosion.
pub const EXPLOSION_JITTER: f32 = 0.5;
/// Amplitude of the per-particle ambient wobble.
pub const AMBIENT_JITTER: f32 = 0.05;

#[derive(Clone, Debug, PartialEq)]
pub enum BlendError {
    CountMismatch { expected: usize, got: usize },
}

impl fmt::Display for BlendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlendError::CountMismatch { expected, got } =>
                write!(f, "target has {} points, field has {}", got, expected),
        }
    }
}

impl std::error::Error for BlendError {}

/// A fixed-size particle field.
#[derive(Debug)]
pub struct ParticleField {
    current: Vec<Point3>,
    base:    Vec<Point3>,
    colors:  Vec<Rgb>,
    time:    f64,
    rng:     StdRng,
}

impl ParticleField {
    /// `count` particles at the origin with an all-origin target.
    pub fn new(count: usize, rng: StdRng) -> Self {
        ParticleField {
            current: vec![Point3::ZERO; count],
            base:    vec![Point3::ZERO; count],
            colors:  vec![Rgb::default(); count],
            time:    0.0,
            rng,
        }
    }

    pub fn len(&self) -> usize { self.current.len() }

    pub fn is_empty(&self) -> bool { self.current.is_empty() }

    pub fn positions(&self) -> &[Point3] { &self.current }

    pub fn colors(&self) -> &[Rgb] { &self.colors }

    pub fn target(&self) -> &[Point3] { &self.base }

    /// Seconds of animation so far.
    pub fn time(&self) -> f64 { self.time }

    pub fn rng_mut(&mut self) -> &mut StdRng { &mut self.rng }

    /// Replace the base target.  On a size mismatch the previous target is
    /// kept.
    pub fn set_target(&mut self, points: Vec<Point3>) -> Result<(), BlendError> {
        if points.len() != self.base.len() {
            return Err(BlendError::CountMismatch { expected: self.base.len(), got: points.len() });
        }
        self.base = points;
        Ok(())
    }

    /// Jump every particle straight onto its base target.
    pub fn snap_to_target(&mut self) {
        self.current.copy_from_slice(&self.base);
    }

    /// Advance one frame.
    pub fn advance(&mut self, params: &ControlParams, dt: f32) {
        let dt = safe_dt(dt);
        self.time += f64::from(dt);
        let time = self.time;
        let k = smoothing_factor(SMOOTHING_RATE, dt);
        let explosion = params.explosion;
        let exploding = explosion > EXPLOSION_FLOOR;

        for (i, (cur, base)) in self.current.iter_mut().zip(&self.base).enumerate() {
            let mut t = *base * params.global_scale;

            if exploding {
                if let Some(dir) = t.direction() {
                    t += dir * explosion;
                }
                let scatter = explosion * EXPLOSION_JITTER;
                t += Point3::new(
                    self.rng.gen::<f32>() - 0.5,
                    self.rng.gen::<f32>() - 0.5,
                    self.rng.gen::<f32>() - 0.5,
                ) * scatter;
            }

            let phase = i as f64;
            t.x += params.target_offset.x + (time + phase).sin() as f32 * AMBIENT_JITTER;
            t.y += params.target_offset.y + (time + phase * 0.5).cos() as f32 * AMBIENT_JITTER;

            *cur += (t - *cur) * k;
        }

        for (color, cur) in self.colors.iter_mut().zip(&self.current) {
            *color = particle_color(time, cur.x, params.global_scale, explosion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Rotation3;
    use rand::SeedableRng;
    use hand_signal::Point2;

    fn params(scale: f32, explosion: f32, offset: Point2) -> ControlParams {
        ControlParams { target_offset: offset, global_scale: scale, explosion, rotation: Rotation3::default() }
    }

    fn field(points: Vec<Point3>) -> ParticleField {
        let mut f = ParticleField::new(points.len(), StdRng::seed_from_u64(3));
        f.set_target(points).unwrap();
        f
    }

    #[test]
    fn wrong_count_keeps_previous_target() {
        let mut f = field(vec![Point3::new(1.0, 0.0, 0.0); 4]);
        let err = f.set_target(vec![Point3::ZERO; 3]).unwrap_err();
        assert_eq!(err, BlendError::CountMismatch { expected: 4, got: 3 });
        assert_eq!(f.target()[0], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn converges_to_scaled_offset_target() {
        let mut f = field(vec![Point3::new(1.0, 2.0, -1.0); 3]);
        let p = params(2.0, 0.0, Point2::new(0.5, -0.5));
        for _ in 0..600 {
            f.advance(&p, 1.0 / 60.0);
        }
        for cur in f.positions() {
            // Within the ambient wobble of (2.5, 3.5, -2).
            assert!((cur.x - 2.5).abs() <= AMBIENT_JITTER + 1e-3);
            assert!((cur.y - 3.5).abs() <= AMBIENT_JITTER + 1e-3);
            assert!((cur.z + 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn blend_step_uses_exponential_factor() {
        let mut f = field(vec![Point3::new(0.0, 0.0, 10.0)]);
        f.advance(&params(1.0, 0.0, Point2::ZERO), 0.1);
        let k = 1.0 - (-0.3_f32).exp();
        assert!((f.positions()[0].z - 10.0 * k).abs() < 1e-4);
    }

    #[test]
    fn explosion_pushes_outwards() {
        let mut f = field(vec![Point3::new(0.0, 0.0, 1.0); 50]);
        let quiet = params(1.0, 0.0, Point2::ZERO);
        let loud = params(1.0, 3.0, Point2::ZERO);
        for _ in 0..600 {
            f.advance(&loud, 1.0 / 60.0);
        }
        // z target is 1 + 3 = 4, scatter at most ±0.75.
        assert!(f.positions().iter().all(|p| p.z > 3.0 && p.z < 5.0));
        for _ in 0..600 {
            f.advance(&quiet, 1.0 / 60.0);
        }
        assert!(f.positions().iter().all(|p| (p.z - 1.0).abs() < 1e-2));
    }

    #[test]
    fn colors_refresh_every_frame() {
        let mut f = field(vec![Point3::ZERO; 2]);
        f.advance(&params(1.0, 0.0, Point2::ZERO), 1.0 / 60.0);
        let first = f.colors()[0];
        assert_ne!(first, Rgb::default());
        f.advance(&params(2.0, 0.0, Point2::ZERO), 1.0);
        assert_ne!(f.colors()[0], first);
    }

    #[test]
    fn bad_dt_does_not_poison_positions() {
        let mut f = field(vec![Point3::new(1.0, 1.0, 1.0)]);
        f.advance(&params(1.0, 0.0, Point2::ZERO), f32::NAN);
        assert!(f.positions()[0].is_finite());
        assert!(f.time().is_finite());
    }

    #[test]
    fn animation_keeps_moving_after_long_uptime() {
        let mut f = field(vec![Point3::ZERO; 2]);
        f.time = 30.0 * 24.0 * 3600.0;
        let p = params(1.0, 0.0, Point2::ZERO);
        f.advance(&p, 1.0 / 60.0);
        let (pos, col, t) = (f.positions().to_vec(), f.colors().to_vec(), f.time());
        f.advance(&p, 1.0 / 60.0);
        assert!(f.time() > t);
        assert_ne!(f.positions(), &pos[..]);
        assert_ne!(f.colors(), &col[..]);
    }
}
