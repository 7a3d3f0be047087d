//! Application configuration.
//!
//! A JSON file whose every field is optional:
//!
//! ```json
//! {
//!   "particles": 5000,
//!   "shape": "flower",
//!   "control": { "idle_speed": 0.05 },
//!   "templates": [ { "name": "V", "points": [ {"x":0,"y":1}, {"x":0.5,"y":0}, {"x":1,"y":1} ] } ],
//!   "vision_timeout_secs": 30
//! }
//! ```
//!
//! Lookup order: `--config <path>`, then [`DEFAULT_CONFIG_FILE`] in the
//! working directory, then built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use hand_signal::{GestureTemplate, RecognizerConfig, StrokeRecognizer};
use particle_control::ControlSettings;

pub const DEFAULT_CONFIG_FILE: &str = "conjure.json";

pub const DEFAULT_PARTICLES: usize = 5000;
pub const DEFAULT_SHAPE: &str = "flower";
pub const DEFAULT_VISION_TIMEOUT_SECS: f32 = 30.0;
pub const DEFAULT_WINDOW_W: usize = 1024;
pub const DEFAULT_WINDOW_H: usize = 720;

/// Order used by the next/previous shape keys.
pub const DEFAULT_SHAPE_CYCLE: [&str; 16] = [
    "flower", "heart", "sphere", "saturn", "sun", "galaxy", "torus", "helix",
    "dna", "cube", "ring", "wave", "vortex", "star", "lamp", "fireworks",
];

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub particles:           usize,
    /// Shape shown at start-up.
    pub shape:               String,
    pub shape_cycle:         Vec<String>,
    pub control:             ControlSettings,
    pub recognizer:          RecognizerConfig,
    /// Stroke templates registered on top of the built-in `R` and `O`.
    pub templates:           Vec<GestureTemplate>,
    /// Seconds to wait for a first detection before falling back to the
    /// pointer.
    pub vision_timeout_secs: f32,
    pub window_width:        usize,
    pub window_height:       usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            particles:           DEFAULT_PARTICLES,
            shape:               DEFAULT_SHAPE.to_string(),
            shape_cycle:         DEFAULT_SHAPE_CYCLE.iter().map(|s| s.to_string()).collect(),
            control:             ControlSettings::default(),
            recognizer:          RecognizerConfig::default(),
            templates:           Vec::new(),
            vision_timeout_secs: DEFAULT_VISION_TIMEOUT_SECS,
            window_width:        DEFAULT_WINDOW_W,
            window_height:       DEFAULT_WINDOW_H,
        }
    }
}

impl AppConfig {
    /// Parse `text` and check it.
    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: AppConfig = serde_json::from_str(text).context("invalid configuration JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = AppConfig::from_json(&text)
            .with_context(|| format!("loading config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// An explicit path must exist.  Otherwise [`DEFAULT_CONFIG_FILE`] is used
    /// when present, and defaults when not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return AppConfig::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            AppConfig::load(fallback)
        } else {
            log::info!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(AppConfig::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.particles > 0, "particles must be at least 1");
        ensure!(
            self.window_width > 0 && self.window_height > 0,
            "window size {}x{} is empty", self.window_width, self.window_height
        );
        ensure!(
            self.vision_timeout_secs.is_finite() && self.vision_timeout_secs >= 0.0,
            "vision_timeout_secs must be a non-negative number"
        );
        ensure!(
            self.recognizer.resample_points >= 2,
            "recognizer.resample_points must be at least 2"
        );
        // Normalized templates span the unit box; a floor at or above it
        // rejects every template.
        let min_size = self.recognizer.min_size;
        ensure!(
            min_size.is_finite() && (0.0..1.0).contains(&min_size),
            "recognizer.min_size must be in [0, 1), got {}", min_size
        );
        Ok(())
    }

    /// Recognizer with the built-in templates plus [`AppConfig::templates`].
    pub fn build_recognizer(&self) -> Result<StrokeRecognizer> {
        let mut recognizer = StrokeRecognizer::with_config(self.recognizer.clone());
        for template in &self.templates {
            recognizer
                .register(template.clone())
                .with_context(|| format!("gesture template \"{}\"", template.name))?;
            log::info!("registered gesture template \"{}\"", template.name);
        }
        let missing = recognizer.missing_builtins();
        ensure!(
            missing.is_empty(),
            "recognizer thresholds reject the built-in gestures {:?}", missing
        );
        Ok(recognizer)
    }
}
