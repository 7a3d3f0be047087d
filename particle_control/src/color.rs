//! Particle colour model.
//!
//! Hue drifts slowly with time and shifts with each particle's x position;
//! lightness lifts while the cloud is zoomed in or exploded.

use serde::{Deserialize, Serialize};

/// Hue drift per second (full wheel every 10 s).
pub const HUE_DRIFT: f32 = 0.1;
/// Hue shift per world unit of x.
pub const HUE_PER_X: f32 = 0.05;
pub const SATURATION: f32 = 0.8;
pub const BASE_LIGHTNESS: f32 = 0.5;
pub const BRIGHT_LIGHTNESS: f32 = 0.8;
/// Scale above which particles are drawn bright.
pub const BRIGHT_SCALE: f32 = 1.5;
/// Explosion above which particles are drawn bright.
pub const BRIGHT_EXPLOSION: f32 = 0.5;

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }

    /// HSL → RGB; `h` wraps, `s` and `l` in `[0, 1]`.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s <= 0.0 {
            return Rgb::new(l, l, l);
        }
        let h = h.rem_euclid(1.0);
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb::new(
            hue_channel(p, q, h + 1.0 / 3.0),
            hue_channel(p, q, h),
            hue_channel(p, q, h - 1.0 / 3.0),
        )
    }

    /// Packed `0xAARRGGBB`, alpha opaque.
    pub fn to_argb(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        0xFF00_0000 | (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Colour of a particle at world x `x`, `time` seconds in.
pub fn particle_color(time: f64, x: f32, global_scale: f32, explosion: f32) -> Rgb {
    let hue_base = (time * f64::from(HUE_DRIFT)).rem_euclid(1.0) as f32;
    let hue = (hue_base + x * HUE_PER_X).rem_euclid(1.0);
    let lightness = if global_scale > BRIGHT_SCALE || explosion > BRIGHT_EXPLOSION {
        BRIGHT_LIGHTNESS
    } else {
        BASE_LIGHTNESS
    };
    Rgb::from_hsl(hue, SATURATION, lightness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5
    }

    #[test]
    fn primary_hues() {
        assert!(close(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(Rgb::from_hsl(1.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 1.0, 0.0)));
        assert!(close(Rgb::from_hsl(2.0 / 3.0, 1.0, 0.5), Rgb::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn grey_without_saturation() {
        assert_eq!(Rgb::from_hsl(0.3, 0.0, 0.4), Rgb::new(0.4, 0.4, 0.4));
    }

    #[test]
    fn argb_is_opaque() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.0).to_argb(), 0xFFFF_0000);
        assert_eq!(Rgb::new(0.0, 0.0, 0.0).to_argb() >> 24, 0xFF);
    }

    #[test]
    fn negative_x_still_valid_hue() {
        let c = particle_color(0.0, -7.0, 1.0, 0.0);
        assert!(close(c, Rgb::from_hsl(0.65, SATURATION, BASE_LIGHTNESS)));
    }

    #[test]
    fn bright_when_zoomed_or_exploded() {
        let lum = |c: Rgb| c.r.max(c.g).max(c.b) + c.r.min(c.g).min(c.b);
        let base = particle_color(1.0, 0.0, 1.0, 0.0);
        let zoomed = particle_color(1.0, 0.0, 2.0, 0.0);
        let exploded = particle_color(1.0, 0.0, 1.0, 1.0);
        assert!((lum(base) - 2.0 * BASE_LIGHTNESS).abs() < 1e-5);
        assert!((lum(zoomed) - 2.0 * BRIGHT_LIGHTNESS).abs() < 1e-5);
        assert!((lum(exploded) - 2.0 * BRIGHT_LIGHTNESS).abs() < 1e-5);
    }
}
