//! # conjure
//!
//! Hand-gesture controller for a particle cloud, with a software-rendered
//! point visualizer.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Move hand | One | Cloud follows the hand centre |
//! | Open palm, then pinch | One | Arm control; pinch distance then drives the burst |
//! | Open palm while armed | One | Release control |
//! | Pinch both hands, spread / close | Two | Lock position, zoom with the spread |
//! | Draw `R` or `O` while pinching | One | Start fast auto-rotation |
//! | Pinch (one or both hands) | Any | Stop auto-rotation |
//!
//! ## Input sources
//!
//! * (default) **Pointer mode**: the mouse is a single open hand; holding the
//!   left button counts as direct manipulation.
//! * `--landmarks <file|->`: JSON-lines detector frames (see [`source`]).
//! * `leap` feature, `--leap`: polls a real LeapMotion controller via LeapC.
//!
//! With a hand source, the app waits `vision_timeout_secs` for the first
//! detection and otherwise drops to pointer mode.
//!
//! ### Keyboard
//!
//! | Key | Command |
//! |---|---|
//! | `Up` / `Down` | Tilt the cloud (held) |
//! | `Left` / `Right` | Spin offset (held) |
//! | `+` / `-` | Idle rotation speed (held) |
//! | `R` | Reset rotation |
//! | `N` / `Space` | Next shape |
//! | `P` / `Backspace` | Previous shape |
//! | `Q` / `Escape` | Quit |

pub mod config;
pub mod source;
#[cfg(feature = "leap")]
pub mod leap;
pub mod camera;
pub mod visualizer;
pub mod app;
