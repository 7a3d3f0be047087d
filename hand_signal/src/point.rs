//! 2-D point used for screen-space centres and stroke paths.

use std::ops::{Add, Mul, Sub};
use serde::{Deserialize, Serialize};

/// A point in the mirrored, y-up interaction plane (≈ `[-1, 1]²` for hand
/// centres, `[0, 1]²` for normalized strokes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    pub fn distance(self, other: Point2) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Linear interpolation; `t = 0` → `self`, `t = 1` → `other`.
    pub fn lerp(self, other: Point2, t: f32) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 { Point2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 { Point2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Point2 {
    type Output = Point2;
    fn mul(self, k: f32) -> Point2 { Point2::new(self.x * k, self.y * k) }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self { Point2::new(x, y) }
}
