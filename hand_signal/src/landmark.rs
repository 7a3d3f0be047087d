//! The 21-point hand landmark layout (MediaPipe hand landmarker convention).
//!
//! Coordinates are normalized image coordinates: `x` 0 (left) → 1 (right) of
//! the *un-mirrored* camera frame, `y` 0 (top) → 1 (bottom).  `z` is relative
//! depth and is carried through but not used by the feature extractor.

use serde::{Deserialize, Serialize};

/// Number of landmarks in one detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Landmark used as the hand centre (middle-finger base).
pub const CENTER: usize = MIDDLE_MCP;

/// One tracked anatomical point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane (depth ignored).
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// All 21 landmarks of one detected hand, in detector order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from a detector slice.  Returns `None` unless exactly
    /// [`LANDMARK_COUNT`] landmarks are supplied.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(HandLandmarks { points })
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;
    fn index(&self, index: usize) -> &Landmark { &self.points[index] }
}

impl std::ops::IndexMut<usize> for HandLandmarks {
    fn index_mut(&mut self, index: usize) -> &mut Landmark { &mut self.points[index] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_requires_exact_count() {
        let twenty = vec![Landmark::default(); 20];
        let twenty_one = vec![Landmark::default(); 21];
        assert!(HandLandmarks::from_slice(&twenty).is_none());
        assert!(HandLandmarks::from_slice(&twenty_one).is_some());
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }
}
