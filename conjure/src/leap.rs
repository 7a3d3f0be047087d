//! Leap Motion hand source (feature `leap`).
//!
//! Each tracked hand's bone joints are projected into the 21-point detector
//! layout, in normalized image coordinates (x right, y down, un-mirrored), so
//! hardware frames go through exactly the same feature extraction as camera
//! frames.
//!
//! | Landmark             | Leap joint                        |
//! |----------------------|-----------------------------------|
//! | wrist                | middle metacarpal, proximal end   |
//! | 1st joint of a digit | proximal bone, proximal end       |
//! | 2nd joint            | intermediate bone, proximal end   |
//! | 3rd joint            | distal bone, proximal end         |
//! | tip                  | distal bone, far end              |

use std::sync::mpsc::Sender;

use hand_signal::{HandLandmarks, Landmark, LANDMARK_COUNT};

use crate::source::HandSource;

/// Horizontal tracking span mapped onto the image width, mm.
pub const SPAN_X_MM: f32 = 400.0;
/// Lowest and highest palm heights mapped onto the image, mm.
pub const MIN_Y_MM:  f32 = 80.0;
pub const MAX_Y_MM:  f32 = 400.0;
/// Depth span, mm.
pub const SPAN_Z_MM: f32 = 400.0;

/// Project one Leap-space position (mm, y up) to a normalized landmark.
pub fn project(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(
        0.5 + x / SPAN_X_MM,
        1.0 - (y - MIN_Y_MM) / (MAX_Y_MM - MIN_Y_MM),
        z / SPAN_Z_MM,
    )
}

/// Gesture source backed by a real LeapMotion controller.
///
/// Requires the LeapC shared library installed.  If the connection cannot be
/// opened the source ends immediately, which the app treats as "no camera".
pub struct LeapHandSource;

impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<Vec<HandLandmarks>>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("LeapC connection failed: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("opening LeapMotion device failed: {:?}", e);
            return;
        }
        log::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut hands = Vec::new();
                for hand in frame.hands() {
                    let digits: Vec<_> = hand.digits().collect();
                    if digits.len() < 5 { continue; }

                    let mut points = [Landmark::default(); LANDMARK_COUNT];
                    let wrist = digits[2].metacarpal().prev_joint();
                    points[0] = project(wrist.x, wrist.y, wrist.z);

                    for (f, digit) in digits.iter().take(5).enumerate() {
                        // The thumb's metacarpal is zero-length, so its
                        // proximal bone starts at the CMC joint.
                        let joints = [
                            digit.proximal().prev_joint(),
                            digit.intermediate().prev_joint(),
                            digit.distal().prev_joint(),
                            digit.distal().next_joint(),
                        ];
                        for (j, p) in joints.iter().enumerate() {
                            points[1 + f * 4 + j] = project(p.x, p.y, p.z);
                        }
                    }
                    hands.push(HandLandmarks::new(points));
                }
                if tx.send(hands).is_err() { return; }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_of_the_volume_is_the_image_centre() {
        let mid = (MIN_Y_MM + MAX_Y_MM) / 2.0;
        let l = project(0.0, mid, 0.0);
        assert!((l.x - 0.5).abs() < 1e-6);
        assert!((l.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn higher_hands_are_nearer_the_top() {
        assert!(project(0.0, 350.0, 0.0).y < project(0.0, 150.0, 0.0).y);
        assert!(project(100.0, 200.0, 0.0).x > 0.5);
    }
}
