//! Software-rendered preview using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────┬──────────────┐
//! │ [MODE]                                       │  TARGET      │
//! │                                              │   az el r    │
//! │            wireframe cube + axes             │  CURRENT     │
//! │            seen from the orbit camera        │   az el r    │
//! │                                              │  TRACKING    │
//! │                                              │  HANDS       │
//! │                                              │  ┌────────┐  │
//! │                                              │  │skeleton│  │
//! │                                              │  └────────┘  │
//! ├──────────────────────────────────────────────┴──────────────┤
//! │ status bar                                                  │
//! │ key legend                                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drawing goes through [`Canvas`], a plain ARGB buffer, so everything but
//! the window itself can be exercised headless.

use std::sync::mpsc::Sender;

use hand_frame::{HandFrame, Landmark, HAND_CONNECTIONS};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use orbit_control::{OrbitState, ResetHandle};
use tracing::debug;

use crate::perspective::PerspectiveCamera;
use crate::scene::{GestureBadge, Scene};
use crate::source::SimSnapshot;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 960;
pub const WIN_H:     usize = 600;
const PANEL_W:       usize = 220;
pub const PREVIEW_W: usize = WIN_W - PANEL_W;
pub const PREVIEW_H: usize = WIN_H - STATUS_H;
const STATUS_H:      usize = 44;
const STATUS_Y:      usize = WIN_H - STATUS_H;
const BG_COLOR:      u32   = 0xFF1A1A2E;
const PANEL_BG:      u32   = 0xFF16213E;
const TEXT_BG:       u32   = 0xFF0F3460;
const TEXT_COLOR:    u32   = 0xFFEEEEEE;
const DIM_COLOR:     u32   = 0xFF888888;
const HEAD_COLOR:    u32   = 0xFFFFD700;

// Detected-hands inset, camera coordinates scaled into the side panel.
const HANDS_X:       usize = PREVIEW_W + 10;
const HANDS_Y:       usize = 234;
const HANDS_W:       usize = 200;
const HANDS_H:       usize = 150;
const HANDS_BG:      u32   = 0xFF000000;
const BONE_COLOR:    u32   = 0xFFFF0000;
const JOINT_COLOR:   u32   = 0xFFFFFFFF;

/// Read-only view of everything the frame shows besides the geometry.
pub struct Overlay<'a> {
    pub badge:    &'a GestureBadge,
    pub target:   &'a OrbitState,
    pub current:  &'a OrbitState,
    pub tracking: &'a str,
    pub status:   &'a str,
    /// Latest detection, drawn as a skeleton.
    pub hands:    &'a HandFrame,
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    pub buf: Vec<u32>,
    pub w:   usize,
    pub h:   usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; w * h], w, h }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    /// Bresenham line, clipped to `clip_w × clip_h` from the top-left.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), clip_w: usize, clip_h: usize, color: u32) {
        // Projected points can land absurdly far off-screen near the camera.
        let limit = 4.0 * self.w.max(self.h) as f64;
        if [from.0, from.1, to.0, to.1].iter().any(|v| !v.is_finite() || v.abs() > limit) {
            return;
        }
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (cw, ch) = (clip_w.min(self.w) as i64, clip_h.min(self.h) as i64);

        loop {
            if (0..cw).contains(&x0) && (0..ch).contains(&y0) {
                self.buf[y0 as usize * self.w + x0 as usize] = color;
            }
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    /// Minimal bitmap font: 3×5 glyphs scaled by `scale`.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > self.w { break; }
        }
    }

    // ── Frame composition ─────────────────────────────────────────────────

    pub fn draw_scene(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        for seg in &scene.segments {
            let a = camera.project(seg.a, PREVIEW_W, PREVIEW_H);
            let b = camera.project(seg.b, PREVIEW_W, PREVIEW_H);
            if let (Some(a), Some(b)) = (a, b) {
                self.draw_line(a, b, PREVIEW_W, PREVIEW_H, seg.color);
            }
        }
    }

    pub fn draw_badge(&mut self, badge: &GestureBadge) {
        let color = badge.color();
        let fill = blend(TEXT_BG, color, 0.25 + 0.5 * badge.flash);
        self.fill_rect(12, 12, 96, 26, fill);
        self.draw_border(12, 12, 96, 26, color);
        self.draw_label(badge.label(), 20, 18, 3, TEXT_COLOR);
    }

    fn draw_orbit(&mut self, title: &str, o: &OrbitState, y: usize) {
        let x = PREVIEW_W + 12;
        self.draw_label(title, x, y, 2, HEAD_COLOR);
        self.draw_label(&format!("az  {:+.3}", o.azimuth),   x, y + 18, 2, TEXT_COLOR);
        self.draw_label(&format!("el  {:+.3}", o.elevation), x, y + 32, 2, TEXT_COLOR);
        self.draw_label(&format!("r   {:.3}",  o.radius),    x, y + 46, 2, TEXT_COLOR);
    }

    /// Skeleton of every detected hand inside the inset.  Landmarks outside
    /// the camera's unit square are left out, as are bones touching them.
    pub fn draw_hands(&mut self, hands: &HandFrame) {
        self.fill_rect(HANDS_X, HANDS_Y, HANDS_W, HANDS_H, HANDS_BG);
        self.draw_border(HANDS_X - 1, HANDS_Y - 1, HANDS_W + 2, HANDS_H + 2, DIM_COLOR);

        let to_inset = |p: &Landmark| {
            let inside = (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y);
            inside.then(|| {
                (
                    HANDS_X as f64 + p.x as f64 * HANDS_W as f64,
                    HANDS_Y as f64 + p.y as f64 * HANDS_H as f64,
                )
            })
        };

        for hand in hands.hands() {
            for &(a, b) in &HAND_CONNECTIONS {
                let from = hand.landmark(a).and_then(to_inset);
                let to = hand.landmark(b).and_then(to_inset);
                if let (Some(from), Some(to)) = (from, to) {
                    self.draw_line(from, to, self.w, self.h, BONE_COLOR);
                }
            }
            for (x, y) in hand.landmarks.iter().filter_map(to_inset) {
                let (x, y) = (x.round() as usize, y.round() as usize);
                self.fill_rect(x.saturating_sub(1), y.saturating_sub(1), 3, 3, JOINT_COLOR);
            }
        }
    }

    pub fn compose(&mut self, scene: &Scene, camera: &PerspectiveCamera, overlay: &Overlay<'_>) {
        self.clear(BG_COLOR);
        self.draw_scene(scene, camera);
        self.draw_badge(overlay.badge);

        self.fill_rect(PREVIEW_W, 0, PANEL_W, STATUS_Y, PANEL_BG);
        self.draw_orbit("TARGET",  overlay.target,  16);
        self.draw_orbit("CURRENT", overlay.current, 96);
        self.draw_label("TRACKING", PREVIEW_W + 12, 176, 2, HEAD_COLOR);
        self.draw_label(overlay.tracking, PREVIEW_W + 12, 194, 1, TEXT_COLOR);
        self.draw_label("HANDS", PREVIEW_W + 12, 214, 2, HEAD_COLOR);
        self.draw_hands(overlay.hands);

        self.fill_rect(0, STATUS_Y, self.w, STATUS_H, TEXT_BG);
        self.draw_label(overlay.status, 10, STATUS_Y + 8, 2, TEXT_COLOR);
        self.draw_label(
            "L-drag=one hand (rotate)  R-drag=two hands (zoom, spread by x)  R=reset  Q/Esc=quit",
            10, WIN_H - 12, 1, DIM_COLOR,
        );
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer: the window
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    sim_tx: Sender<SimSnapshot>,
    reset:  Option<ResetHandle>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimSnapshot>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Hand Orbit",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(WIN_W, WIN_H),
            sim_tx,
            reset: None,
        })
    }

    /// Route the reset key to a tracker.
    pub fn bind_reset(&mut self, handle: ResetHandle) {
        self.reset = Some(handle);
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Sample keys and pointer.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if pressed(Key::Q) || pressed(Key::Escape) {
            return false;
        }
        if pressed(Key::R) {
            if let Some(handle) = &self.reset {
                if !handle.reset() {
                    debug!("reset ignored, tracker gone");
                }
            }
        }

        let cursor = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| ((x / PREVIEW_W as f32).clamp(0.0, 1.0), (y / PREVIEW_H as f32).clamp(0.0, 1.0)))
            .unwrap_or((0.5, 0.5));
        let snap = SimSnapshot {
            cursor,
            left:  self.window.get_mouse_down(MouseButton::Left),
            right: self.window.get_mouse_down(MouseButton::Right),
        };
        // Receiver is gone when replaying; nothing to do then.
        let _ = self.sim_tx.send(snap);
        true
    }

    pub fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera, overlay: &Overlay<'_>) {
        self.canvas.compose(scene, camera, overlay);
        self.window.update_with_buffer(&self.canvas.buf, WIN_W, WIN_H).ok();
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
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

/// Mix two ARGB colours; `t = 0` is all `a`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t) as u32) << shift
    };
    0xFF000000 | mix(16) | mix(8) | mix(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perspective::DEFAULT_FOV_DEG;
    use crate::scene::{Segment, CUBE_COLOR};
    use crate::source::synth_hand;
    use hand_frame::{Hand, LANDMARK_COUNT, THUMB_CMC, WRIST};
    use glam::DVec3;

    #[test]
    fn line_hits_both_endpoints() {
        let mut c = Canvas::new(20, 20);
        c.draw_line((2.0, 3.0), (15.0, 11.0), 20, 20, 0xFFFFFFFF);
        assert_eq!(c.pixel(2, 3), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(15, 11), Some(0xFFFFFFFF));
    }

    #[test]
    fn line_is_clipped_not_wrapped() {
        let mut c = Canvas::new(10, 10);
        c.draw_line((-5.0, 5.0), (20.0, 5.0), 6, 10, 0xFFFFFFFF);
        assert_eq!(c.pixel(5, 5), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(6, 5), Some(BG_COLOR));
        assert_eq!(c.pixel(0, 6), Some(BG_COLOR));
    }

    #[test]
    fn far_off_lines_are_dropped() {
        let mut c = Canvas::new(10, 10);
        c.draw_line((0.0, 0.0), (1e12, 5.0), 10, 10, 0xFFFFFFFF);
        c.draw_line((0.0, 0.0), (f64::NAN, 5.0), 10, 10, 0xFFFFFFFF);
        assert!(c.buf.iter().all(|&p| p == BG_COLOR));
    }

    #[test]
    fn scene_is_drawn_inside_preview() {
        let mut c = Canvas::new(WIN_W, WIN_H);
        let cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, PREVIEW_W as f64 / PREVIEW_H as f64);
        let scene = Scene {
            segments: vec![Segment { a: DVec3::new(-1.0, 0.0, 0.0), b: DVec3::new(1.0, 0.0, 0.0), color: CUBE_COLOR }],
        };
        c.draw_scene(&scene, &cam);
        assert_eq!(c.pixel(PREVIEW_W / 2, PREVIEW_H / 2), Some(CUBE_COLOR));
    }

    #[test]
    fn compose_fills_panel_and_status() {
        let mut c = Canvas::new(WIN_W, WIN_H);
        let cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, 1.5);
        let badge = GestureBadge::default();
        let home = OrbitState::default();
        let overlay = Overlay {
            badge: &badge, target: &home, current: &home, tracking: "running", status: "ready",
            hands: &HandFrame::empty(),
        };
        c.compose(&Scene::default(), &cam, &overlay);
        assert_eq!(c.pixel(WIN_W - 1, 2), Some(PANEL_BG));
        assert_eq!(c.pixel(WIN_W - 1, STATUS_Y + 1), Some(TEXT_BG));
        assert_eq!(c.pixel(HANDS_X + HANDS_W / 2, HANDS_Y + HANDS_H / 2), Some(HANDS_BG));
    }

    fn flat_hand(rest: (f32, f32), wrist: (f32, f32), thumb_cmc: (f32, f32)) -> HandFrame {
        let mut pts = [Landmark::new(rest.0, rest.1, 0.0); LANDMARK_COUNT];
        pts[WRIST] = Landmark::new(wrist.0, wrist.1, 0.0);
        pts[THUMB_CMC] = Landmark::new(thumb_cmc.0, thumb_cmc.1, 0.0);
        HandFrame::new(vec![Hand::new(pts)])
    }

    #[test]
    fn hand_skeleton_draws_bones_and_joints() {
        let mut c = Canvas::new(WIN_W, WIN_H);
        c.draw_hands(&flat_hand((0.25, 0.5), (0.25, 0.5), (0.75, 0.5)));

        // wrist→thumb base runs across the middle of the inset
        assert_eq!(c.pixel(HANDS_X + 100, HANDS_Y + 75), Some(BONE_COLOR));
        assert_eq!(c.pixel(HANDS_X + 50, HANDS_Y + 75), Some(JOINT_COLOR));
        assert_eq!(c.pixel(HANDS_X + 150, HANDS_Y + 75), Some(JOINT_COLOR));
        assert_eq!(c.pixel(HANDS_X + 100, HANDS_Y + 20), Some(HANDS_BG));
    }

    #[test]
    fn off_camera_landmarks_are_not_drawn() {
        let mut c = Canvas::new(WIN_W, WIN_H);
        c.draw_hands(&flat_hand((0.25, 0.5), (0.25, 0.5), (1.75, 0.5)));

        assert_eq!(c.pixel(HANDS_X + 100, HANDS_Y + 75), Some(HANDS_BG));
        assert_eq!(c.pixel(HANDS_X + 50, HANDS_Y + 75), Some(JOINT_COLOR));
        // nothing spills past the inset
        assert_eq!(c.pixel(HANDS_X + HANDS_W + 5, HANDS_Y + 75), Some(BG_COLOR));
    }

    #[test]
    fn simulated_hand_fits_the_inset() {
        let mut c = Canvas::new(WIN_W, WIN_H);
        c.draw_hands(&HandFrame::new(vec![synth_hand(0.5, 0.5)]));
        assert_eq!(c.pixel(HANDS_X + 100, HANDS_Y + 75), Some(JOINT_COLOR));
        assert!(c.buf.iter().any(|&p| p == BONE_COLOR));
    }

    #[test]
    fn label_scales() {
        let mut c = Canvas::new(20, 20);
        c.draw_label("1", 0, 0, 2, 0xFFFFFFFF);
        // top row of '1' is 0b010: middle column, two pixels wide at scale 2
        assert_eq!(c.pixel(2, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(3, 1), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(0, 0), Some(BG_COLOR));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }
}
