//! 3-D point for target clouds and rendered particle positions.

use std::ops::{Add, AddAssign, Mul, Sub};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `None` at (near) the origin.
    pub fn direction(self) -> Option<Point3> {
        let len = self.length();
        if len > 1e-6 { Some(self * (1.0 / len)) } else { None }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 { Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}

impl AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Point3) { *self = *self + rhs; }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 { Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}

impl Mul<f32> for Point3 {
    type Output = Point3;
    fn mul(self, k: f32) -> Point3 { Point3::new(self.x * k, self.y * k, self.z * k) }
}
