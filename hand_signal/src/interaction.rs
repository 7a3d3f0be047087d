//! Interaction Aggregator: folds 0, 1 or 2 hand features into one signal.
//!
//! Hands are taken in detector order.  Spread is symmetric, but the sign of
//! [`InteractionSignal::rotation`] flips if the detector swaps which hand it
//! reports first; no hand identity is tracked to stabilise it.

use serde::{Deserialize, Serialize};

use crate::feature::HandFeature;
use crate::point::Point2;

/// Unified per-frame interaction signal.  The zero value means "no input".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionSignal {
    /// One hand: its centre.  Two hands: the midpoint.
    pub center: Point2,
    /// Distance between the two hand centres (0 unless two-handed).
    pub spread: f32,
    /// `atan2(dy, dx)` from hand 1 to hand 2, radians (0 unless two-handed).
    pub rotation: f32,
    pub is_two_handed: bool,
    pub both_hands_pinched: bool,
}

/// Aggregate the hands of one frame.  Hands beyond the second are ignored.
pub fn aggregate(hands: &[HandFeature]) -> InteractionSignal {
    match hands {
        [] => InteractionSignal::default(),
        [only] => InteractionSignal {
            center: only.center,
            ..InteractionSignal::default()
        },
        [h1, h2, ..] => {
            let dx = h2.center.x - h1.center.x;
            let dy = h2.center.y - h1.center.y;
            InteractionSignal {
                center: h1.center.midpoint(h2.center),
                spread: dx.hypot(dy),
                rotation: dy.atan2(dx),
                is_two_handed: true,
                both_hands_pinched: h1.is_pinch && h2.is_pinch,
            }
        }
    }
}
