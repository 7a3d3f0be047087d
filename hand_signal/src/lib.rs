//! # hand_signal
//!
//! Turns a noisy per-frame stream of hand-landmark detections into a small
//! set of stable control signals, plus a one-shot stroke gesture.
//!
//! ```text
//!  detections ──► feature::extract ──► interaction::aggregate ──► HandFrame
//!                        │                       │
//!                        └──── StrokeTracker ◄───┘  (pinch-drag path → "R")
//! ```
//!
//! * [`landmark`]: the 21-point MediaPipe hand layout.
//! * [`feature`]: per-hand [`HandFeature`]: centre, pinch distance, pose flags.
//! * [`interaction`]: combine 0–2 hands into one [`InteractionSignal`].
//! * [`stroke`]: resample / normalize / template-match unistroke recognizer.
//! * [`frame`]: [`SignalPipeline`], one [`HandFrame`] per detector tick.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_signal::{SignalPipeline, HandLandmarks};
//!
//! let mut pipeline = SignalPipeline::new();
//! let frame = pipeline.process(&[HandLandmarks::default()]);
//! assert!(frame.has_hands);
//! assert!(!frame.interaction.is_two_handed);
//! ```

pub mod point;
pub mod landmark;
pub mod feature;
pub mod interaction;
pub mod stroke;
pub mod frame;

pub use point::Point2;
pub use landmark::{Landmark, HandLandmarks, LANDMARK_COUNT};
pub use feature::{HandFeature, FingerStates};
pub use interaction::InteractionSignal;
pub use stroke::{
    GestureTemplate, RecognizerConfig, Rejection, StrokeMatch, StrokeRecognizer,
    StrokeTracker, TemplateError,
};
pub use frame::{HandFrame, SignalPipeline};
