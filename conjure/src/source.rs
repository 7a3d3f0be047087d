//! Hand-landmark sources.
//!
//! The public interface is a `Vec<HandLandmarks>` per detector frame delivered
//! over a `mpsc` channel.  The render loop only ever wants the newest one, so
//! [`drain_latest`] empties the channel each tick.
//!
//! | Source               | Input                                   |
//! |----------------------|-----------------------------------------|
//! | [`JsonLinesSource`]  | file or stdin, one JSON frame per line  |
//! | `LeapHandSource`     | Leap Motion controller (feature `leap`) |

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use hand_signal::{HandLandmarks, Landmark, LANDMARK_COUNT};

/// Pace of a recorded file: roughly a webcam detector's rate.
pub const FILE_FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver detector frames over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Vec<HandLandmarks>>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<Vec<HandLandmarks>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// Draining
// ════════════════════════════════════════════════════════════════════════════

/// What one render tick got from a source.
#[derive(Clone, Debug, PartialEq)]
pub enum SourcePoll {
    /// The newest frame since the last tick.
    Frame(Vec<HandLandmarks>),
    /// Nothing new.
    Idle,
    /// The source thread has finished and the channel is empty.
    Disconnected,
}

/// Take every queued frame and keep only the last.
pub fn drain_latest(rx: &Receiver<Vec<HandLandmarks>>) -> SourcePoll {
    let mut latest = None;
    loop {
        match rx.try_recv() {
            Ok(frame) => latest = Some(frame),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                if latest.is_none() {
                    return SourcePoll::Disconnected;
                }
                break;
            }
        }
    }
    match latest {
        Some(frame) => SourcePoll::Frame(frame),
        None => SourcePoll::Idle,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JSON lines
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct WireFrame {
    #[serde(default)]
    hands: Vec<WireHand>,
}

#[derive(Deserialize)]
struct WireHand {
    landmarks: Vec<Landmark>,
}

/// Decode one line: `{"hands":[{"landmarks":[{"x":..,"y":..,"z":..}, …]}]}`.
/// Hands without exactly 21 landmarks are dropped with a warning.
pub fn parse_line(line: &str) -> Result<Vec<HandLandmarks>, serde_json::Error> {
    let frame: WireFrame = serde_json::from_str(line)?;
    let mut hands = Vec::with_capacity(frame.hands.len());
    for (i, hand) in frame.hands.into_iter().enumerate() {
        match HandLandmarks::from_slice(&hand.landmarks) {
            Some(h) => hands.push(h),
            None => log::warn!(
                "hand {} has {} landmarks, expected {}; skipped",
                i, hand.landmarks.len(), LANDMARK_COUNT
            ),
        }
    }
    Ok(hands)
}

/// Detector frames read from a JSON-lines stream.
pub struct JsonLinesSource {
    reader: Box<dyn BufRead + Send>,
    label:  String,
    pace:   Option<Duration>,
}

impl JsonLinesSource {
    pub fn new(reader: Box<dyn BufRead + Send>, label: &str, pace: Option<Duration>) -> Self {
        JsonLinesSource { reader, label: label.to_string(), pace }
    }

    /// A live stream on stdin, forwarded as fast as it arrives.
    pub fn stdin() -> Self {
        JsonLinesSource::new(Box::new(BufReader::new(io::stdin())), "stdin", None)
    }

    /// A recording, replayed at [`FILE_FRAME_INTERVAL`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening landmark file {}", path.display()))?;
        Ok(JsonLinesSource::new(
            Box::new(BufReader::new(file)),
            &path.display().to_string(),
            Some(FILE_FRAME_INTERVAL),
        ))
    }

    /// `-` is stdin, anything else a file path.
    pub fn from_arg(arg: &str) -> Result<Self> {
        if arg == "-" {
            Ok(JsonLinesSource::stdin())
        } else {
            JsonLinesSource::open(Path::new(arg))
        }
    }
}

impl HandSource for JsonLinesSource {
    fn run(self: Box<Self>, tx: Sender<Vec<HandLandmarks>>) {
        let JsonLinesSource { reader, label, pace } = *self;
        let mut sent = 0usize;
        for (n, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    log::error!("{}: read failed at line {}: {}", label, n + 1, e);
                    break;
                }
            };
            if line.trim().is_empty() { continue; }
            let hands = match parse_line(&line) {
                Ok(h) => h,
                Err(e) => {
                    log::warn!("{}:{}: {}", label, n + 1, e);
                    continue;
                }
            };
            if tx.send(hands).is_err() { return; }
            sent += 1;
            if let Some(d) = pace {
                thread::sleep(d);
            }
        }
        log::info!("{}: end of landmark stream after {} frames", label, sent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn hand_json(count: usize, x: f32) -> String {
        let pts: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"x":{},"y":{},"z":0.0}}"#, x, i as f32 / 40.0))
            .collect();
        format!(r#"{{"landmarks":[{}]}}"#, pts.join(","))
    }

    fn line(hands: &[String]) -> String {
        format!(r#"{{"hands":[{}]}}"#, hands.join(","))
    }

    #[test]
    fn parses_two_hands() {
        let hands = parse_line(&line(&[hand_json(21, 0.25), hand_json(21, 0.75)])).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0][0].x, 0.25);
        assert_eq!(hands[1][20].y, 0.5);
    }

    #[test]
    fn short_hand_is_skipped() {
        let hands = parse_line(&line(&[hand_json(20, 0.1), hand_json(21, 0.2)])).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0][0].x, 0.2);
    }

    #[test]
    fn missing_z_defaults_to_zero() {
        let pts = vec![r#"{"x":0.5,"y":0.5}"#; 21].join(",");
        let hands = parse_line(&format!(r#"{{"hands":[{{"landmarks":[{}]}}]}}"#, pts)).unwrap();
        assert_eq!(hands[0][8].z, 0.0);
    }

    #[test]
    fn no_hands_is_an_empty_frame() {
        assert!(parse_line(r#"{"hands":[]}"#).unwrap().is_empty());
        assert!(parse_line("{}").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_line("not json").is_err());
        assert!(parse_line(r#"{"hands":"nope"}"#).is_err());
    }

    #[test]
    fn stream_skips_bad_lines() {
        let text = format!(
            "{}\n\nnonsense\n{}\n",
            line(&[hand_json(21, 0.1)]),
            line(&[])
        );
        let source = JsonLinesSource::new(Box::new(Cursor::new(text.into_bytes())), "test", None);
        let rx = spawn_hand_source(source);
        let frames: Vec<_> = rx.iter().collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 1);
        assert!(frames[1].is_empty());
    }

    #[test]
    fn drain_keeps_newest_frame() {
        let (tx, rx) = mpsc::channel();
        assert_eq!(drain_latest(&rx), SourcePoll::Idle);
        tx.send(vec![]).unwrap();
        tx.send(vec![HandLandmarks::default()]).unwrap();
        assert_eq!(drain_latest(&rx), SourcePoll::Frame(vec![HandLandmarks::default()]));
        assert_eq!(drain_latest(&rx), SourcePoll::Idle);
    }

    #[test]
    fn drain_reports_disconnect_after_last_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(vec![]).unwrap();
        drop(tx);
        assert_eq!(drain_latest(&rx), SourcePoll::Frame(vec![]));
        assert_eq!(drain_latest(&rx), SourcePoll::Disconnected);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(JsonLinesSource::from_arg("/definitely/not/here.jsonl").is_err());
    }
}
