//! Top-level application state machine.
//!
//! `AppState` owns the `SignalPipeline`, the `ParticleEngine` and the
//! `ShapeLibrary`.  Each frame it takes whatever the hand source delivered
//! (or the pointer, once in pointer mode), runs the engine, and hands the
//! result to the visualizer.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hand_signal::{HandFrame, HandLandmarks, Point2, SignalPipeline};
use particle_control::{FrameOutput, ParticleEngine};
use particle_shapes::ShapeLibrary;

use crate::config::AppConfig;
use crate::source::{drain_latest, spawn_hand_source, JsonLinesSource, SourcePoll};
use crate::visualizer::Visualizer;

/// Manual tilt / spin step per key press, radians.
pub const ROTATE_STEP: f32 = 0.1;
/// Idle speed step per key press, rad/s.
pub const SPEED_STEP:  f32 = 0.01;
pub const MAX_IDLE_SPEED: f32 = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// Inputs
// ════════════════════════════════════════════════════════════════════════════

/// Where hand frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode { Vision, Pointer }

/// Which source to start.
#[derive(Debug, Clone, PartialEq)]
pub enum InputChoice {
    Pointer,
    /// JSON-lines file, or stdin for `-`.
    Landmarks(PathBuf),
    #[cfg(feature = "leap")]
    Leap,
}

/// Discrete keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    TiltUp,
    TiltDown,
    SpinLeft,
    SpinRight,
    SpeedUp,
    SpeedDown,
    ResetRotation,
    NextShape,
    PrevShape,
    Quit,
}

/// Mouse state in interaction-plane coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub center:  Point2,
    pub pressed: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── signal → motion ──────────────────────────────────────────────────
    pipeline: SignalPipeline,
    engine:   ParticleEngine,
    last:     Option<FrameOutput>,

    // ── shapes ───────────────────────────────────────────────────────────
    library:     ShapeLibrary,
    shape_cycle: Vec<String>,
    shape_index: usize,

    // ── input mode ───────────────────────────────────────────────────────
    mode:          InputMode,
    elapsed:       f32,
    timeout:       f32,
    seen_hands:    bool,
    source_closed: bool,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, mode: InputMode) -> Result<Self> {
        AppState::with_rng(cfg, mode, StdRng::from_entropy())
    }

    pub fn with_rng(cfg: &AppConfig, mode: InputMode, rng: StdRng) -> Result<Self> {
        let library = ShapeLibrary::with_builtins();
        let pipeline = SignalPipeline::with_recognizer(cfg.build_recognizer()?);
        let mut engine = ParticleEngine::with_rng(cfg.particles, cfg.control.clone(), rng);
        engine
            .switch_shape_from(&library, &cfg.shape)
            .with_context(|| format!("initial shape \"{}\"", cfg.shape))?;

        let mut shape_cycle: Vec<String> = Vec::new();
        for name in &cfg.shape_cycle {
            if library.contains(name) {
                shape_cycle.push(name.clone());
            } else {
                log::warn!("shape cycle: unknown shape \"{}\" dropped", name);
            }
        }
        if shape_cycle.is_empty() {
            shape_cycle = library.names().into_iter().map(String::from).collect();
        }
        // Off-cycle start: the next key lands on the first entry.
        let shape_index = shape_cycle
            .iter()
            .position(|s| *s == cfg.shape)
            .unwrap_or(shape_cycle.len() - 1);

        let status = match mode {
            InputMode::Vision  => format!("Waiting for hands ({:.0}s)", cfg.vision_timeout_secs),
            InputMode::Pointer => "Pointer mode".to_string(),
        };

        Ok(AppState {
            pipeline,
            engine,
            last: None,
            library,
            shape_cycle,
            shape_index,
            mode,
            elapsed: 0.0,
            timeout: cfg.vision_timeout_secs,
            seen_hands: false,
            source_closed: false,
            status,
        })
    }

    // ── process one AppCommand ───────────────────────────────────────────

    pub fn handle_command(&mut self, cmd: AppCommand) {
        let s = self.engine.settings().clone();
        match cmd {
            AppCommand::TiltUp    => self.engine.set_manual_rotation(s.manual_x - ROTATE_STEP, s.manual_y),
            AppCommand::TiltDown  => self.engine.set_manual_rotation(s.manual_x + ROTATE_STEP, s.manual_y),
            AppCommand::SpinLeft  => self.engine.set_manual_rotation(s.manual_x, s.manual_y - ROTATE_STEP),
            AppCommand::SpinRight => self.engine.set_manual_rotation(s.manual_x, s.manual_y + ROTATE_STEP),
            AppCommand::SpeedUp   =>
                self.engine.set_idle_speed((s.idle_speed + SPEED_STEP).min(MAX_IDLE_SPEED)),
            AppCommand::SpeedDown =>
                self.engine.set_idle_speed((s.idle_speed - SPEED_STEP).max(0.0)),
            AppCommand::ResetRotation => self.engine.reset_rotation(),
            AppCommand::NextShape => self.cycle_shape(1),
            AppCommand::PrevShape => self.cycle_shape(self.shape_cycle.len() - 1),
            AppCommand::Quit => { /* handled in run loop */ }
        }
        let s = self.engine.settings();
        self.status = match cmd {
            AppCommand::NextShape | AppCommand::PrevShape | AppCommand::Quit => return,
            AppCommand::ResetRotation => "Rotation reset".to_string(),
            AppCommand::SpeedUp | AppCommand::SpeedDown =>
                format!("Idle speed {:.2} rad/s", s.idle_speed),
            _ => format!("Tilt {:+.1}  Spin {:+.1}", s.manual_x, s.manual_y),
        };
    }

    fn cycle_shape(&mut self, step: usize) {
        let n = self.shape_cycle.len();
        let next = (self.shape_index + step) % n;
        let name = self.shape_cycle[next].clone();
        match self.engine.switch_shape_from(&self.library, &name) {
            Ok(_) => {
                self.shape_index = next;
                self.status = format!("Shape: {}", name);
            }
            Err(e) => self.status = format!("Shape {} failed: {}", name, e),
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Run one frame.  `poll` is what the hand source delivered since the
    /// last tick; it is ignored in pointer mode.
    pub fn tick(&mut self, poll: SourcePoll, pointer: PointerInput, dt: f32) -> FrameOutput {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        let frame = match self.mode {
            InputMode::Pointer => HandFrame::pointer(pointer.center, pointer.pressed),
            InputMode::Vision  => match self.vision_frame(poll) {
                Some(f) => f,
                None => HandFrame::pointer(pointer.center, pointer.pressed),
            },
        };

        let out = self.engine.process_frame(&frame, dt);
        if let Some(g) = &frame.gesture {
            self.status = format!("Gesture {}", g);
        }
        self.last = Some(out);
        out
    }

    /// `None` once the app has dropped to pointer mode.
    fn vision_frame(&mut self, poll: SourcePoll) -> Option<HandFrame> {
        match poll {
            SourcePoll::Frame(hands) => Some(self.detected(&hands)),
            SourcePoll::Idle if self.seen_hands || self.elapsed < self.timeout =>
                Some(self.pipeline.latest()),
            SourcePoll::Idle => {
                self.fall_back(&format!("no hand detection within {:.0}s", self.timeout));
                None
            }
            SourcePoll::Disconnected if self.seen_hands => {
                if !self.source_closed {
                    log::warn!("hand source closed");
                    self.source_closed = true;
                    self.pipeline.reset();
                    self.status = "Hand source closed".to_string();
                }
                Some(self.pipeline.latest())
            }
            SourcePoll::Disconnected => {
                self.fall_back("hand source closed before any detection");
                None
            }
        }
    }

    fn detected(&mut self, hands: &[HandLandmarks]) -> HandFrame {
        if !self.seen_hands {
            log::info!("first hand detection after {:.1}s", self.elapsed);
            self.seen_hands = true;
            self.status = "Vision mode".to_string();
        }
        self.pipeline.process(hands)
    }

    fn fall_back(&mut self, reason: &str) {
        log::warn!("{}; switching to pointer input", reason);
        self.mode = InputMode::Pointer;
        self.pipeline.reset();
        self.status = "Pointer mode (no camera)".to_string();
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn engine(&self)      -> &ParticleEngine      { &self.engine }
    pub fn mode(&self)        -> InputMode            { self.mode }
    pub fn last_output(&self) -> Option<&FrameOutput> { self.last.as_ref() }
    pub fn shape_name(&self)  -> &str {
        self.engine.current_shape().unwrap_or("-")
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(choice: &InputChoice) -> Result<Option<Receiver<Vec<HandLandmarks>>>> {
    match choice {
        InputChoice::Pointer => Ok(None),
        InputChoice::Landmarks(path) => {
            let source = JsonLinesSource::from_arg(&path.to_string_lossy())?;
            Ok(Some(spawn_hand_source(source)))
        }
        #[cfg(feature = "leap")]
        InputChoice::Leap => Ok(Some(spawn_hand_source(crate::leap::LeapHandSource))),
    }
}

/// Run the full application.
///
/// Opens the hand source (if any) and the window, then drives the
/// poll / tick / render loop at ~60 fps until the window closes or `Quit`.
pub fn run(cfg: AppConfig, input: InputChoice) -> Result<()> {
    let rx = open_source(&input)?;
    let mode = if rx.is_some() { InputMode::Vision } else { InputMode::Pointer };

    let mut app = AppState::new(&cfg, mode)?;
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height)?;

    let mut last = Instant::now();
    while vis.is_open() {
        // 1. Keyboard
        for cmd in vis.poll_commands() {
            if cmd == AppCommand::Quit { return Ok(()); }
            app.handle_command(cmd);
        }

        // 2. Newest detector frame
        let poll = match &rx {
            Some(rx) if app.mode() == InputMode::Vision => drain_latest(rx),
            _ => SourcePoll::Idle,
        };

        // 3. Per-frame logic
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.tick(poll, vis.pointer(), dt);

        // 4. Render
        vis.render(&app);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
