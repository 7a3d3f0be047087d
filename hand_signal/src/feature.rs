//! Hand Feature Extractor: one [`HandFeature`] per detected hand per frame.
//!
//! Hands carry no identity across frames: each call starts from scratch and
//! the detector's ordering is used as-is.
//!
//! # Heuristics
//!
//! * **Centre**: landmark 9 (middle-finger base), mapped to a y-up `[-1, 1]²`
//!   plane and mirrored in x so "move right" means "particles move right" for
//!   a front-facing camera.
//! * **Finger up**: tip `y` above (smaller than) its PIP joint; the thumb
//!   compares tip against its IP joint.
//! * **Pinch**: thumb tip to index tip closer than [`PINCH_THRESHOLD`].
//! * **Open palm** and **pinch** take priority over **index pointing** and
//!   **thumb up**, forcing both false.

use serde::{Deserialize, Serialize};

use crate::landmark::*;
use crate::point::Point2;

/// Unscaled thumb–index distance below which the hand counts as pinching.
pub const PINCH_THRESHOLD: f32 = 0.1;

/// Reported pinch distance = raw distance × this factor, so a near-touch is
/// ≈0 and a comfortable open pinch is ≈1.  Not clamped above.
pub const PINCH_DISTANCE_SCALE: f32 = 4.0;

/// Extension state of the five digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerStates {
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerStates {
    pub fn from_landmarks(lm: &HandLandmarks) -> Self {
        let up = |tip: usize, joint: usize| lm[tip].y < lm[joint].y;
        FingerStates {
            thumb:  up(THUMB_TIP, THUMB_IP),
            index:  up(INDEX_TIP, INDEX_PIP),
            middle: up(MIDDLE_TIP, MIDDLE_PIP),
            ring:   up(RING_TIP, RING_PIP),
            pinky:  up(PINKY_TIP, PINKY_PIP),
        }
    }

    /// Index, middle, ring and pinky all extended (thumb not required).
    pub fn four_fingers_up(&self) -> bool {
        self.index && self.middle && self.ring && self.pinky
    }
}

/// Compact per-hand feature set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFeature {
    /// Mirrored centre used by everything downstream.
    pub center: Point2,
    /// Un-mirrored centre (same y-up plane), kept for display overlays.
    pub raw_center: Point2,
    /// Scaled thumb–index distance: 0 = touching, ≈1 = open pinch.
    pub pinch_distance: f32,
    pub fingers: FingerStates,
    pub is_open_palm: bool,
    pub is_pinch: bool,
    pub is_index_pointing: bool,
    pub is_thumb_up: bool,
}

impl HandFeature {
    /// The synthetic hand reported by a pointer device: an open palm at
    /// `center`, wide pinch distance, never pinching.
    pub fn pointer(center: Point2) -> Self {
        HandFeature {
            center,
            raw_center: Point2::new(-center.x, center.y),
            pinch_distance: 1.0,
            fingers: FingerStates { thumb: true, index: true, middle: true, ring: true, pinky: true },
            is_open_palm: true,
            is_pinch: false,
            is_index_pointing: false,
            is_thumb_up: false,
        }
    }
}

/// Extract the feature set of one hand.
pub fn extract(lm: &HandLandmarks) -> HandFeature {
    let c = &lm[CENTER];
    let raw_center = Point2::new((c.x - 0.5) * 2.0, -(c.y - 0.5) * 2.0);
    let center = Point2::new(-raw_center.x, raw_center.y);

    let distance = lm[THUMB_TIP].planar_distance(&lm[INDEX_TIP]);
    let fingers = FingerStates::from_landmarks(lm);

    let is_open_palm = fingers.four_fingers_up();
    let is_pinch = distance < PINCH_THRESHOLD;
    let dominant = is_open_palm || is_pinch;

    let is_index_pointing = !dominant
        && fingers.index && !fingers.middle && !fingers.ring && !fingers.pinky;
    let is_thumb_up = !dominant
        && fingers.thumb && !fingers.index && !fingers.middle && !fingers.ring && !fingers.pinky;

    HandFeature {
        center,
        raw_center,
        pinch_distance: (distance * PINCH_DISTANCE_SCALE).max(0.0),
        fingers,
        is_open_palm,
        is_pinch,
        is_index_pointing,
        is_thumb_up,
    }
}

/// Extract features for every hand the detector reported, in detector order.
pub fn extract_all(hands: &[HandLandmarks]) -> Vec<HandFeature> {
    hands.iter().map(extract).collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builder for synthetic hands: every landmark starts at the centre and
    /// individual fingers are raised or curled around their PIP joint.
    pub(crate) struct HandBuilder {
        lm: HandLandmarks,
    }

    impl HandBuilder {
        pub(crate) fn at(x: f32, y: f32) -> Self {
            let mut lm = HandLandmarks::default();
            for p in lm.points.iter_mut() {
                *p = Landmark::new(x, y, 0.0);
            }
            // Thumb and index tips well apart by default (no pinch).
            lm[THUMB_TIP] = Landmark::new(x - 0.15, y + 0.05, 0.0);
            lm[INDEX_TIP] = Landmark::new(x + 0.05, y + 0.05, 0.0);
            let mut b = HandBuilder { lm };
            for f in 0..5 { b = b.finger(f, false); }
            b
        }

        /// Finger 0 = thumb … 4 = pinky.
        pub(crate) fn finger(mut self, finger: usize, up: bool) -> Self {
            let (tip, joint) = match finger {
                0 => (THUMB_TIP, THUMB_IP),
                1 => (INDEX_TIP, INDEX_PIP),
                2 => (MIDDLE_TIP, MIDDLE_PIP),
                3 => (RING_TIP, RING_PIP),
                _ => (PINKY_TIP, PINKY_PIP),
            };
            let jy = self.lm[joint].y;
            self.lm[tip].y = if up { jy - 0.1 } else { jy + 0.05 };
            self
        }

        pub(crate) fn open_palm(self) -> Self {
            (1..5).fold(self, |b, f| b.finger(f, true))
        }

        /// Bring thumb and index tips to `raw` apart (unscaled distance).
        pub(crate) fn pinch(mut self, raw: f32) -> Self {
            let idx = self.lm[INDEX_TIP];
            self.lm[THUMB_TIP] = Landmark::new(idx.x - raw, idx.y, 0.0);
            self
        }

        pub(crate) fn build(self) -> HandLandmarks { self.lm }
    }

    #[test]
    fn center_is_mirrored() {
        // Raw x = 0.75 is right of centre in the camera frame; mirrored it
        // lands on the left of the interaction plane.
        let f = extract(&HandBuilder::at(0.75, 0.25).build());
        assert!((f.raw_center.x - 0.5).abs() < 1e-6);
        assert!((f.center.x + 0.5).abs() < 1e-6);
        assert!((f.center.y - 0.5).abs() < 1e-6, "y-up: top of frame is positive");
    }

    #[test]
    fn pinch_distance_scaled_by_four() {
        let f = extract(&HandBuilder::at(0.5, 0.5).pinch(0.02).build());
        assert!(f.is_pinch);
        assert!((f.pinch_distance - 0.08).abs() < 1e-5);
    }

    #[test]
    fn wide_pinch_not_clamped() {
        let f = extract(&HandBuilder::at(0.5, 0.5).pinch(0.4).build());
        assert!(!f.is_pinch);
        assert!(f.pinch_distance > 1.5);
    }

    #[test]
    fn open_palm_needs_four_fingers() {
        let f = extract(&HandBuilder::at(0.5, 0.5).open_palm().build());
        assert!(f.is_open_palm);
        let g = extract(&HandBuilder::at(0.5, 0.5).open_palm().finger(4, false).build());
        assert!(!g.is_open_palm);
    }

    #[test]
    fn index_pointing() {
        let f = extract(&HandBuilder::at(0.5, 0.5).finger(1, true).build());
        assert!(f.is_index_pointing);
        assert!(!f.is_thumb_up);
    }

    #[test]
    fn pinch_suppresses_index_pointing() {
        let f = extract(&HandBuilder::at(0.5, 0.5).finger(1, true).pinch(0.01).build());
        assert!(f.is_pinch);
        assert!(!f.is_index_pointing);
    }

    #[test]
    fn thumb_up_requires_curled_fingers() {
        let f = extract(&HandBuilder::at(0.5, 0.5).finger(0, true).build());
        assert!(f.is_thumb_up);
        let g = extract(&HandBuilder::at(0.5, 0.5).finger(0, true).finger(2, true).build());
        assert!(!g.is_thumb_up);
    }

    #[test]
    fn open_palm_suppresses_thumb_up() {
        let f = extract(&HandBuilder::at(0.5, 0.5).open_palm().finger(0, true).build());
        assert!(f.is_open_palm);
        assert!(!f.is_thumb_up);
        assert!(!f.is_index_pointing);
    }

    #[test]
    fn pointer_hand_is_open_and_unpinched() {
        let f = HandFeature::pointer(Point2::new(0.3, -0.2));
        assert!(f.is_open_palm);
        assert!(!f.is_pinch);
        assert_eq!(f.pinch_distance, 1.0);
    }
}
