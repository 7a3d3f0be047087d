//! Frame-rate-independent smoothing.
//!
//! A per-frame blend `x += (target − x)·k` only behaves the same at 30 and
//! 144 fps if `k` is derived from the elapsed time.  Two forms are used:
//!
//! | Helper               | Factor            | Meaning                                   |
//! |----------------------|-------------------|-------------------------------------------|
//! | [`damp_factor`]      | `1 − base^Δt`     | fraction of the gap left after 1 s = base |
//! | [`smoothing_factor`] | `1 − e^(−λ·Δt)`   | exponential approach at rate λ            |

/// Fast damping: 0.1 % of the gap remains after one second.
pub const FAST_DAMP_BASE: f32 = 0.001;
/// Slow damping: half the gap remains after one second.
pub const SLOW_DAMP_BASE: f32 = 0.5;
/// Idle tilt: 0.9^60, i.e. a 10 % blend per frame at 60 fps.
pub const IDLE_TILT_BASE: f32 = 0.001_797_010_3;
/// Particle position smoothing rate (≈ 5 % per frame at 60 fps).
pub const SMOOTHING_RATE: f32 = 3.0;
/// Used in place of a missing or nonsensical frame time.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Replace a non-finite or non-positive frame time by [`DEFAULT_DT`].
pub fn safe_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { DEFAULT_DT }
}

pub fn damp_factor(base: f32, dt: f32) -> f32 {
    1.0 - base.powf(dt)
}

pub fn smoothing_factor(lambda: f32, dt: f32) -> f32 {
    1.0 - (-lambda * dt).exp()
}

/// Move `current` the fraction `factor` of the way to `target`.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_tilt_base_is_point_nine_per_frame() {
        assert!((IDLE_TILT_BASE - 0.9_f64.powi(60) as f32).abs() < 1e-7);
        assert!((damp_factor(IDLE_TILT_BASE, 1.0 / 60.0) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        // One second at 30 fps vs 120 fps leaves the same residual gap.
        let run = |fps: u32| {
            let dt = 1.0 / fps as f32;
            (0..fps).fold(1.0_f32, |x, _| approach(x, 0.0, damp_factor(SLOW_DAMP_BASE, dt)))
        };
        assert!((run(30) - 0.5).abs() < 1e-3);
        assert!((run(120) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn smoothing_matches_rate() {
        let k = smoothing_factor(SMOOTHING_RATE, 1.0 / 60.0);
        assert!((k - 0.0488).abs() < 1e-3);
    }

    #[test]
    fn bad_dt_replaced() {
        assert_eq!(safe_dt(0.0), DEFAULT_DT);
        assert_eq!(safe_dt(-1.0), DEFAULT_DT);
        assert_eq!(safe_dt(f32::NAN), DEFAULT_DT);
        assert_eq!(safe_dt(f32::INFINITY), DEFAULT_DT);
        assert_eq!(safe_dt(0.02), 0.02);
    }
}
