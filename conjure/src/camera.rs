//! Perspective camera for the software renderer, and the inverse mapping from
//! window pixels to the interaction plane.
//!
//! ```text
//!        y                    screen
//!        │                 ┌──────────┐
//!        │    camera       │  ·   ·   │
//!        └──── x  ◄─ z=6 ──┤    ·     │   fov 75° vertical
//!       /                  └──────────┘
//!      z
//! ```

use hand_signal::Point2;
use particle_control::Rotation3;
use particle_shapes::Point3;

pub const CAMERA_Z:     f32 = 6.0;
pub const FOV_DEGREES:  f32 = 75.0;
pub const NEAR_PLANE:   f32 = 0.1;

/// Rotate `p` by the Euler triple, x then y then z applied as `Rx·Ry·Rz`.
pub fn rotate(p: Point3, r: &Rotation3) -> Point3 {
    let (sz, cz) = r.z.sin_cos();
    let p = Point3::new(p.x * cz - p.y * sz, p.x * sz + p.y * cz, p.z);
    let (sy, cy) = r.y.sin_cos();
    let p = Point3::new(p.x * cy + p.z * sy, p.y, -p.x * sy + p.z * cy);
    let (sx, cx) = r.x.sin_cos();
    Point3::new(p.x, p.y * cx - p.z * sx, p.y * sx + p.z * cx)
}

/// A projected point: pixel position and distance from the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x:     f32,
    pub y:     f32,
    pub depth: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    width:  f32,
    height: f32,
    focal:  f32,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        let height = height as f32;
        let focal = (height / 2.0) / (FOV_DEGREES.to_radians() / 2.0).tan();
        Camera { width: width as f32, height, focal }
    }

    /// `None` for points behind the near plane.
    pub fn project(&self, p: Point3) -> Option<ScreenPoint> {
        let depth = CAMERA_Z - p.z;
        if depth <= NEAR_PLANE || !p.is_finite() {
            return None;
        }
        let k = self.focal / depth;
        Some(ScreenPoint {
            x: self.width / 2.0 + p.x * k,
            y: self.height / 2.0 - p.y * k,
            depth,
        })
    }

    /// Window pixel to interaction-plane point in `[-1, 1]²`, y up.
    pub fn to_signal(&self, px: f32, py: f32) -> Point2 {
        let x = (px / self.width) * 2.0 - 1.0;
        let y = 1.0 - (py / self.height) * 2.0;
        Point2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
    }
}
