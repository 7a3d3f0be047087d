//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ status line                                              │
//! │ MODE  SHAPE  SCALE  flags                                │
//! │                                                          │
//! │                 ·  ·· ·  particle cloud  ·               │
//! │                   ·· ·  ·   (additive points)            │
//! │                                                          │
//! │ key legend                                               │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use particle_control::FrameOutput;

use crate::app::{AppCommand, AppState, InputMode, PointerInput};
use crate::camera::{rotate, Camera};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const HUD_H:        usize = 24;
const LEGEND_H:     usize = 14;
const BG_COLOR:     u32   = 0xFF05050A;
const TEXT_BG:      u32   = 0xFF0F1A30;
const TEXT_COLOR:   u32   = 0xFFEEEEEE;
const DIM_TEXT:     u32   = 0xFF888888;
const FLAG_COLOR:   u32   = 0xFFFFD700;  // gold
const CURSOR_COLOR: u32   = 0xFF66CCFF;
/// Depth at which points start to fade, and the floor of the fade.
const FOG_START:    f32   = 4.0;
const FOG_SPAN:     f32   = 14.0;
const FOG_MIN:      f32   = 0.25;
/// Points nearer than this are drawn 2×2.
const NEAR_DEPTH:   f32   = 4.0;

const LEGEND: &str =
    "Mouse=move  Arrows=tilt/spin  +/-=idle speed  R=reset  N/P=shape  Q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Key map
// ════════════════════════════════════════════════════════════════════════════

pub fn key_command(key: Key) -> Option<AppCommand> {
    Some(match key {
        Key::Up    => AppCommand::TiltUp,
        Key::Down  => AppCommand::TiltDown,
        Key::Left  => AppCommand::SpinLeft,
        Key::Right => AppCommand::SpinRight,
        Key::Equal | Key::NumPadPlus  => AppCommand::SpeedUp,
        Key::Minus | Key::NumPadMinus => AppCommand::SpeedDown,
        Key::R     => AppCommand::ResetRotation,
        Key::N | Key::Space => AppCommand::NextShape,
        Key::P | Key::Backspace => AppCommand::PrevShape,
        Key::Q | Key::Escape => AppCommand::Quit,
        _ => return None,
    })
}

/// Commands that keep firing while their key is held.
pub fn repeats(cmd: AppCommand) -> bool {
    matches!(
        cmd,
        AppCommand::TiltUp | AppCommand::TiltDown | AppCommand::SpinLeft | AppCommand::SpinRight
            | AppCommand::SpeedUp | AppCommand::SpeedDown
    )
}

/// Second HUD line.
pub fn hud_line(out: Option<&FrameOutput>, mode: InputMode, shape: &str) -> String {
    let mode = match mode {
        InputMode::Vision  => "VISION",
        InputMode::Pointer => "POINTER",
    };
    let Some(out) = out else {
        return format!("{}  {}", mode, shape);
    };
    let mut line = format!("{}  {}  scale {:.2}", mode, shape, out.global_scale);
    if out.is_control_active { line.push_str("  [active]"); }
    if out.is_pinch_locked   { line.push_str("  [lock]"); }
    if out.is_auto_rotating  { line.push_str("  [spin]"); }
    if out.explosion > 0.0   { line.push_str(&format!("  burst {:.1}", out.explosion)); }
    line
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    camera: Camera,
    mouse:  Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            "Conjure: hand-driven particles",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("creating {}x{} window: {}", width, height, e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            camera: Camera::new(width, height),
            mouse: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Keyboard commands since the last frame.
    pub fn poll_commands(&self) -> Vec<AppCommand> {
        let once = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_command)
            .filter(|c| !repeats(*c));
        let held = self
            .window
            .get_keys_pressed(KeyRepeat::Yes)
            .into_iter()
            .filter_map(key_command)
            .filter(|c| repeats(*c));
        once.chain(held).collect()
    }

    /// Mouse position in the interaction plane; the centre when the cursor
    /// has never entered the window.
    pub fn pointer(&mut self) -> PointerInput {
        if let Some(pos) = self.window.get_mouse_pos(MouseMode::Clamp) {
            self.mouse = Some(pos);
        }
        let center = match self.mouse {
            Some((x, y)) => self.camera.to_signal(x, y),
            None => Default::default(),
        };
        PointerInput { center, pressed: self.window.get_mouse_down(MouseButton::Left) }
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) {
        // Clear
        self.buf.fill(BG_COLOR);

        // ── Particles ─────────────────────────────────────────────────────
        let rotation = app.last_output().map(|o| o.rotation).unwrap_or_default();
        let engine = app.engine();
        for (p, c) in engine.positions().iter().zip(engine.colors()) {
            let Some(s) = self.camera.project(rotate(*p, &rotation)) else { continue };
            if s.x < 0.0 || s.y < 0.0 { continue; }
            let fog = (1.0 - (s.depth - FOG_START) / FOG_SPAN).clamp(FOG_MIN, 1.0);
            let color = blend(BG_COLOR, c.to_argb(), fog);
            let (x, y) = (s.x as usize, s.y as usize);
            self.add_pixel(x, y, color);
            if s.depth < NEAR_DEPTH {
                self.add_pixel(x + 1, y, color);
                self.add_pixel(x, y + 1, color);
                self.add_pixel(x + 1, y + 1, color);
            }
        }

        // ── Pointer cursor ────────────────────────────────────────────────
        if app.mode() == InputMode::Pointer {
            if let Some((mx, my)) = self.mouse {
                self.draw_diamond(mx as usize, my as usize, 4, CURSOR_COLOR);
            }
        }

        // ── Status bar ────────────────────────────────────────────────────
        let (w, h) = (self.width, self.height);
        self.fill_rect(0, 0, w, HUD_H, TEXT_BG);
        self.draw_label(&app.status, 8, 4, TEXT_COLOR);
        let line = hud_line(app.last_output(), app.mode(), app.shape_name());
        self.draw_label(&line, 8, 14, FLAG_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        let legend_y = h.saturating_sub(LEGEND_H);
        self.fill_rect(0, legend_y, w, LEGEND_H, TEXT_BG);
        self.draw_label(LEGEND, 8, legend_y + 5, DIM_TEXT);

        self.window.update_with_buffer(&self.buf, w, h).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.height) {
            for col in x..(x+w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Additive: overlapping particles brighten each other.
    fn add_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            let i = y * self.width + x;
            self.buf[i] = add(self.buf[i], color);
        }
    }

    fn draw_diamond(&mut self, cx: usize, cy: usize, r: usize, color: u32) {
        for dy in 0..=r as isize {
            let dx = r as isize - dy;
            for &(sx, sy) in &[
                (cx as isize + dx, cy as isize + dy),
                (cx as isize - dx, cy as isize + dy),
                (cx as isize + dx, cy as isize - dy),
                (cx as isize - dx, cy as isize - dy),
            ] {
                if sx >= 0 && sy >= 0 {
                    self.set_pixel(sx as usize, sy as usize, color);
                }
            }
        }
    }

    /// Minimal bitmap font: 3×5 characters for the HUD.
    /// Each character is encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

/// Per-channel saturating add of two ARGB colors.
fn add(a: u32, b: u32) -> u32 {
    let ch = |shift: u32| (((a >> shift) & 0xFF) + ((b >> shift) & 0xFF)).min(0xFF) << shift;
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_signal::Point2;
    use particle_control::Rotation3;

    fn output() -> FrameOutput {
        FrameOutput {
            target_offset:     Point2::ZERO,
            global_scale:      1.5,
            explosion:         0.0,
            rotation:          Rotation3::default(),
            is_auto_rotating:  true,
            is_control_active: false,
            is_pinch_locked:   false,
        }
    }

    #[test]
    fn every_command_has_a_key() {
        let keys = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Equal, Key::Minus,
                    Key::R, Key::N, Key::P, Key::Q];
        let cmds: Vec<_> = keys.iter().filter_map(|k| key_command(*k)).collect();
        assert_eq!(cmds.len(), 10);
        assert_eq!(key_command(Key::Escape), Some(AppCommand::Quit));
        assert_eq!(key_command(Key::Z), None);
    }

    #[test]
    fn only_rotation_and_speed_repeat() {
        assert!(repeats(AppCommand::SpinLeft));
        assert!(repeats(AppCommand::SpeedUp));
        assert!(!repeats(AppCommand::NextShape));
        assert!(!repeats(AppCommand::Quit));
    }

    #[test]
    fn hud_shows_flags() {
        let line = hud_line(Some(&output()), InputMode::Pointer, "torus");
        assert_eq!(line, "POINTER  torus  scale 1.50  [spin]");
        assert_eq!(hud_line(None, InputMode::Vision, "ring"), "VISION  ring");
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFF102030, 2.0), 0xFF102030);
    }

    #[test]
    fn add_saturates() {
        assert_eq!(add(0xFF808080, 0xFF808080), 0xFFFFFFFF);
        assert_eq!(add(0xFF010203, 0xFF102030), 0xFF112233);
    }

    #[test]
    fn glyphs_cover_the_legend() {
        let fallback = char_glyph('~');
        for ch in LEGEND.chars().chain("Pointer mode (no camera)".chars()) {
            if ch != ' ' {
                assert_ne!(char_glyph(ch), fallback, "no glyph for {:?}", ch);
            }
        }
    }
}
