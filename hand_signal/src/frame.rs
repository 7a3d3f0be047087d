//! Per-frame output of the hand pipeline, and the pipeline itself.

use serde::{Deserialize, Serialize};

use crate::feature::{extract_all, HandFeature};
use crate::interaction::{aggregate, InteractionSignal};
use crate::landmark::HandLandmarks;
use crate::point::Point2;
use crate::stroke::{StrokeRecognizer, StrokeTracker};

/// Hands beyond this many are dropped before feature extraction.
pub const MAX_HANDS: usize = 2;

/// Everything the control layer needs from one frame of hand input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    pub has_hands:      bool,
    pub hands:          Vec<HandFeature>,
    pub interaction:    InteractionSignal,
    /// Template name, present only on the frame a stroke is recognized.
    pub gesture:        Option<String>,
    /// A pointer device is driving the frame and its button is held.
    #[serde(default)]
    pub pointer_active: bool,
}

impl HandFrame {
    /// No hands, no gesture.
    pub fn empty() -> Self {
        HandFrame::default()
    }

    /// Synthetic single-hand frame for pointer input: an open palm at
    /// `center` that never pinches.  `pressed` marks the button held.
    pub fn pointer(center: Point2, pressed: bool) -> Self {
        let hand = HandFeature::pointer(center);
        HandFrame {
            has_hands: true,
            interaction: aggregate(std::slice::from_ref(&hand)),
            hands: vec![hand],
            gesture: None,
            pointer_active: pressed,
        }
    }

    pub fn primary(&self) -> Option<&HandFeature> {
        self.hands.first()
    }
}

/// Landmarks in, [`HandFrame`] out.  Owns the stroke recognizer and the open
/// stroke between frames.
#[derive(Debug, Default)]
pub struct SignalPipeline {
    recognizer: StrokeRecognizer,
    tracker:    StrokeTracker,
    last:       HandFrame,
}

impl SignalPipeline {
    pub fn new() -> Self {
        SignalPipeline::with_recognizer(StrokeRecognizer::new())
    }

    pub fn with_recognizer(recognizer: StrokeRecognizer) -> Self {
        SignalPipeline { recognizer, tracker: StrokeTracker::new(), last: HandFrame::empty() }
    }

    pub fn recognizer(&self) -> &StrokeRecognizer { &self.recognizer }

    /// Process the detector output of one frame.
    pub fn process(&mut self, hands: &[HandLandmarks]) -> HandFrame {
        let used = &hands[..hands.len().min(MAX_HANDS)];
        let features = extract_all(used);
        let interaction = aggregate(&features);
        let gesture = self
            .tracker
            .update(&features, interaction.center, &self.recognizer)
            .map(|m| {
                log::info!("gesture \"{}\" (distance {:.3})", m.name, m.distance);
                m.name
            });

        let frame = HandFrame {
            has_hands: !features.is_empty(),
            hands: features,
            interaction,
            gesture,
            pointer_active: false,
        };
        self.last = frame.clone();
        frame
    }

    /// The last processed frame again, for render ticks with no new detector
    /// output.  A gesture is reported once only, so it is cleared here.
    pub fn latest(&self) -> HandFrame {
        HandFrame { gesture: None, ..self.last.clone() }
    }

    /// Drop any open stroke and forget the last frame.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.last = HandFrame::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::tests::HandBuilder;
    use crate::stroke::tests::trace;
    use crate::stroke::GestureTemplate;

    /// Image-space landmarks whose mirrored centre lands on `p`.
    fn pinched_at(p: Point2, pinch: bool) -> HandLandmarks {
        let b = HandBuilder::at(0.5 - p.x / 2.0, 0.5 - p.y / 2.0);
        if pinch { b.pinch(0.02).build() } else { b.build() }
    }

    #[test]
    fn empty_input() {
        let mut pipe = SignalPipeline::new();
        let f = pipe.process(&[]);
        assert!(!f.has_hands);
        assert!(f.hands.is_empty());
        assert_eq!(f.interaction, InteractionSignal::default());
        assert!(f.gesture.is_none());
    }

    #[test]
    fn extra_hands_are_ignored() {
        let mut pipe = SignalPipeline::new();
        let h = HandBuilder::at(0.5, 0.5).build();
        let f = pipe.process(&[h.clone(), h.clone(), h]);
        assert_eq!(f.hands.len(), 2);
        assert!(f.interaction.is_two_handed);
    }

    #[test]
    fn pinch_drag_r_yields_gesture_once() {
        let mut pipe = SignalPipeline::new();
        let stroke = trace(&GestureTemplate::letter_r().points, 7);
        for &p in &stroke {
            // Stroke drawn in the [-0.4, 0.4] box.
            let c = Point2::new(p.x * 0.8 - 0.4, p.y * 0.8 - 0.4);
            let f = pipe.process(&[pinched_at(c, true)]);
            assert!(f.gesture.is_none());
        }
        let released = pipe.process(&[pinched_at(Point2::ZERO, false)]);
        assert_eq!(released.gesture.as_deref(), Some("R"));
        assert_eq!(pipe.latest().gesture, None);
        assert!(pipe.latest().has_hands);
        let next = pipe.process(&[pinched_at(Point2::ZERO, false)]);
        assert!(next.gesture.is_none());
    }

    #[test]
    fn pointer_frame_is_single_open_hand() {
        let f = HandFrame::pointer(Point2::new(0.2, -0.1), true);
        assert!(f.has_hands);
        assert!(f.pointer_active);
        assert_eq!(f.interaction.center, Point2::new(0.2, -0.1));
        assert!(!f.interaction.is_two_handed);
        assert!(f.primary().map_or(false, |h| h.is_open_palm && !h.is_pinch));
    }
}
