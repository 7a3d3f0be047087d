//! Interaction State Machine.
//!
//! [`InteractionState`] is a plain value: [`InteractionState::step`] takes the
//! previous state and one [`HandFrame`] and returns the next state plus the
//! frame's [`ControlParams`].  Nothing is global, so whole gesture sequences
//! can be replayed in tests.
//!
//! ## Rules, in evaluation order
//!
//! | Condition                          | Effect                                                        |
//! |------------------------------------|---------------------------------------------------------------|
//! | no hands                           | control and palm latch cleared, locks released, offset (0, 0) |
//! | primary open palm                  | `saw_open_palm` latched                                       |
//! | latched palm + primary pinch       | control activated                                             |
//! | two hands, both pinched, active    | lock position & spread baseline, zoom by spread ratio         |
//! | two hands otherwise                | unlock, follow hands                                          |
//! | one hand, active, open palm        | control released                                              |
//! | one hand, active                   | explosion from pinch distance                                 |
//! | rotate gesture                     | auto-rotate on                                                |
//! | pointer held / two hands / pinch   | auto-rotate off                                               |
//!
//! Rotation then integrates in exactly one of three modes, two-handed before
//! auto-rotating before idle.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use hand_signal::{HandFrame, Point2};

use crate::damping::{
    approach, damp_factor, safe_dt, FAST_DAMP_BASE, IDLE_TILT_BASE, SLOW_DAMP_BASE,
};

// ════════════════════════════════════════════════════════════════════════════
// Feel constants
// ════════════════════════════════════════════════════════════════════════════

/// Interaction-plane → world units, x and y.  Wider than tall, like a camera.
pub const WORLD_SCALE_X: f32 = 5.0;
pub const WORLD_SCALE_Y: f32 = 3.0;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 5.0;
/// Lock baselines at or below this spread never rescale.
pub const LOCK_SPREAD_FLOOR: f32 = 0.05;
/// Pinch distance (scaled) below which there is no explosion.
pub const EXPLOSION_DEAD_ZONE: f32 = 0.1;
pub const EXPLOSION_GAIN: f32 = 8.0;
/// Spin rate while auto-rotating, rad/s.
pub const AUTO_ROTATE_RATE: f32 = 2.0;
/// Default idle spin rate, rad/s.
pub const DEFAULT_IDLE_SPEED: f32 = 0.02;

/// Explosion amount for a (scaled) pinch distance.
pub fn explosion_for(pinch_distance: f32) -> f32 {
    let d = pinch_distance.max(0.0);
    if d > EXPLOSION_DEAD_ZONE { (d - EXPLOSION_DEAD_ZONE) * EXPLOSION_GAIN } else { 0.0 }
}

// ════════════════════════════════════════════════════════════════════════════
// Settings & output
// ════════════════════════════════════════════════════════════════════════════

/// Externally adjustable rotation controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Idle spin rate, rad/s.
    pub idle_speed:     f32,
    /// Target x-tilt while idle, radians.
    pub manual_x:       f32,
    /// Offset added to the accumulated y-spin, radians.
    pub manual_y:       f32,
    /// Gesture names that start auto-rotation.
    pub rotate_symbols: Vec<String>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        ControlSettings {
            idle_speed:     DEFAULT_IDLE_SPEED,
            manual_x:       0.0,
            manual_y:       0.0,
            rotate_symbols: vec!["R".to_string(), "O".to_string()],
        }
    }
}

impl ControlSettings {
    pub fn is_rotate_symbol(&self, gesture: &str) -> bool {
        self.rotate_symbols.iter().any(|s| s == gesture)
    }
}

/// Euler rotation of the whole cloud, radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Per-frame output of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    /// World-space x/y offset of the cloud.
    pub target_offset: Point2,
    pub global_scale:  f32,
    pub explosion:     f32,
    pub rotation:      Rotation3,
}

// ════════════════════════════════════════════════════════════════════════════
// InteractionState
// ════════════════════════════════════════════════════════════════════════════

/// Everything the state machine remembers between frames.
///
/// Invariants: `is_position_locked ⇒ is_pinch_locked`, and
/// `global_scale ∈ [MIN_SCALE, MAX_SCALE]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub is_control_active:    bool,
    pub saw_open_palm:        bool,
    pub is_pinch_locked:      bool,
    pub pinch_start_spread:   f32,
    pub pinch_start_scale:    f32,
    pub is_position_locked:   bool,
    pub locked_target:        Point2,
    pub global_scale:         f32,
    pub is_auto_rotating:     bool,
    /// Spin angle about y, wrapped into `[0, 2π)`.
    pub rotation_accumulator: f32,
    pub rotation:             Rotation3,
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState {
            is_control_active:    false,
            saw_open_palm:        false,
            is_pinch_locked:      false,
            pinch_start_spread:   0.0,
            pinch_start_scale:    1.0,
            is_position_locked:   false,
            locked_target:        Point2::ZERO,
            global_scale:         1.0,
            is_auto_rotating:     false,
            rotation_accumulator: 0.0,
            rotation:             Rotation3::default(),
        }
    }
}

impl InteractionState {
    pub fn new() -> Self { InteractionState::default() }

    /// Advance one frame.
    pub fn step(
        &self,
        frame: &HandFrame,
        settings: &ControlSettings,
        dt: f32,
    ) -> (InteractionState, ControlParams) {
        let dt = safe_dt(dt);
        let mut s = *self;
        let signal = &frame.interaction;
        let primary = if frame.has_hands { frame.primary() } else { None };
        let two_handed = primary.is_some() && signal.is_two_handed;

        let mut target = Point2::ZERO;
        let mut explosion = 0.0;

        match primary {
            None => {
                if s.is_control_active {
                    log::info!("hands lost: control released");
                }
                s.is_control_active = false;
                s.saw_open_palm = false;
                s.unlock();
            }
            Some(hand) => {
                if hand.is_open_palm {
                    s.saw_open_palm = true;
                }
                if s.saw_open_palm && hand.is_pinch && !s.is_control_active {
                    s.is_control_active = true;
                    log::info!("control activated");
                }

                let proposed = Point2::new(
                    signal.center.x * WORLD_SCALE_X,
                    signal.center.y * WORLD_SCALE_Y,
                );

                if two_handed {
                    if signal.both_hands_pinched && s.is_control_active {
                        if !s.is_pinch_locked {
                            s.lock(signal.spread, proposed);
                        }
                        target = s.locked_target;
                        s.rescale(signal.spread);
                    } else {
                        s.unlock();
                        target = proposed;
                    }
                } else {
                    s.unlock();
                    target = proposed;
                    if s.is_control_active {
                        if hand.is_open_palm {
                            s.is_control_active = false;
                            s.pinch_start_spread = 0.0;
                            log::info!("open palm: control released");
                        } else {
                            explosion = explosion_for(hand.pinch_distance);
                        }
                    }
                }
            }
        }

        // ── Auto-rotate latch ────────────────────────────────────────────
        if let Some(g) = frame.gesture.as_deref() {
            if settings.is_rotate_symbol(g) {
                if !s.is_auto_rotating {
                    log::info!("auto-rotate started ({})", g);
                }
                s.is_auto_rotating = true;
            }
        }
        let primary_pinching = primary.map_or(false, |h| h.is_pinch);
        if s.is_auto_rotating && (frame.pointer_active || two_handed || primary_pinching) {
            s.is_auto_rotating = false;
            log::info!("auto-rotate cancelled");
        }

        // ── Rotation integration ─────────────────────────────────────────
        let fast = damp_factor(FAST_DAMP_BASE, dt);
        let slow = damp_factor(SLOW_DAMP_BASE, dt);
        if two_handed {
            s.rotation.z = approach(s.rotation.z, 0.0, fast);
        } else if s.is_auto_rotating {
            s.spin(AUTO_ROTATE_RATE * dt);
            s.rotation.y = s.rotation_accumulator + settings.manual_y;
            s.rotation.z = approach(s.rotation.z, 0.0, slow);
        } else {
            s.spin(settings.idle_speed * dt);
            s.rotation.x = approach(s.rotation.x, settings.manual_x, damp_factor(IDLE_TILT_BASE, dt));
            s.rotation.y = s.rotation_accumulator + settings.manual_y;
            s.rotation.z = approach(s.rotation.z, 0.0, slow);
        }

        let params = ControlParams {
            target_offset: target,
            global_scale:  s.global_scale,
            explosion,
            rotation:      s.rotation,
        };
        (s, params)
    }

    /// Zero the spin accumulator and the x/y rotation.
    pub fn reset_rotation(&mut self) {
        self.rotation_accumulator = 0.0;
        self.rotation.x = 0.0;
        self.rotation.y = 0.0;
    }

    fn spin(&mut self, delta: f32) {
        self.rotation_accumulator = (self.rotation_accumulator + delta).rem_euclid(TAU);
    }

    fn lock(&mut self, spread: f32, at: Point2) {
        self.is_pinch_locked = true;
        self.pinch_start_spread = spread;
        self.pinch_start_scale = self.global_scale;
        self.is_position_locked = true;
        self.locked_target = at;
        log::info!("two-hand lock at spread {:.3}, scale {:.2}", spread, self.global_scale);
    }

    fn unlock(&mut self) {
        if self.is_pinch_locked {
            log::info!("two-hand lock released at scale {:.2}", self.global_scale);
        }
        self.is_pinch_locked = false;
        self.is_position_locked = false;
    }

    fn rescale(&mut self, spread: f32) {
        if !(self.pinch_start_spread > LOCK_SPREAD_FLOOR) {
            return;
        }
        let scale = self.pinch_start_scale * (spread / self.pinch_start_spread);
        if !scale.is_nan() {
            self.global_scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
