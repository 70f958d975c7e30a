//! What the preview shows: a wireframe model around the orbit centre and the
//! gesture badge that tells the user which mode the hands put it in.

use glam::DVec3;
use orbit_control::GestureMode;

// ════════════════════════════════════════════════════════════════════════════
// Segment: one line of the wireframe
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a:     DVec3,
    pub b:     DVec3,
    pub color: u32,
}

pub const CUBE_COLOR:   u32 = 0xFF7FDBFF;
pub const X_AXIS_COLOR: u32 = 0xFFFF4136;
pub const Y_AXIS_COLOR: u32 = 0xFF2ECC40;
pub const Z_AXIS_COLOR: u32 = 0xFF0074D9;
pub const GRID_COLOR:   u32 = 0xFF2A2A4A;

/// The 12 edges of an axis-aligned cube centred on the origin.
pub fn cube_edges(half: f64, color: u32) -> Vec<Segment> {
    let corner = |i: u8| {
        DVec3::new(
            if i & 1 != 0 { half } else { -half },
            if i & 2 != 0 { half } else { -half },
            if i & 4 != 0 { half } else { -half },
        )
    };
    let mut out = Vec::with_capacity(12);
    for i in 0u8..8 {
        for bit in [1u8, 2, 4] {
            // each edge once: from the corner with the bit clear
            if i & bit == 0 {
                out.push(Segment { a: corner(i), b: corner(i | bit), color });
            }
        }
    }
    out
}

pub fn axes(len: f64) -> [Segment; 3] {
    [
        Segment { a: DVec3::ZERO, b: DVec3::X * len, color: X_AXIS_COLOR },
        Segment { a: DVec3::ZERO, b: DVec3::Y * len, color: Y_AXIS_COLOR },
        Segment { a: DVec3::ZERO, b: DVec3::Z * len, color: Z_AXIS_COLOR },
    ]
}

/// Square grid in the plane `y = level`, `lines` lines per direction.
pub fn floor_grid(half: f64, lines: usize, level: f64) -> Vec<Segment> {
    let n = lines.max(2);
    let step = 2.0 * half / (n - 1) as f64;
    (0..n)
        .flat_map(|i| {
            let t = -half + step * i as f64;
            [
                Segment { a: DVec3::new(t, level, -half), b: DVec3::new(t, level, half), color: GRID_COLOR },
                Segment { a: DVec3::new(-half, level, t), b: DVec3::new(half, level, t), color: GRID_COLOR },
            ]
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub segments: Vec<Segment>,
}

impl Default for Scene {
    fn default() -> Self {
        let mut segments = floor_grid(2.0, 9, -1.0);
        segments.extend(cube_edges(1.0, CUBE_COLOR));
        segments.extend(axes(1.6));
        Scene { segments }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureBadge: the on-screen mode indicator
// ════════════════════════════════════════════════════════════════════════════

pub fn mode_color(mode: GestureMode) -> u32 {
    match mode {
        GestureMode::Idle   => 0xFF888888,
        GestureMode::Rotate => 0xFF39CCCC,
        GestureMode::Zoom   => 0xFFFFDC00,
    }
}

/// Current mode plus a short highlight after each change.
#[derive(Clone, Debug)]
pub struct GestureBadge {
    pub mode:  GestureMode,
    /// 1.0 right after a mode change, decays to 0.
    pub flash: f32,
}

impl Default for GestureBadge {
    fn default() -> Self {
        GestureBadge { mode: GestureMode::Idle, flash: 0.0 }
    }
}

impl GestureBadge {
    pub fn show(&mut self, mode: GestureMode) {
        if mode != self.mode {
            self.mode = mode;
            self.flash = 1.0;
        }
    }

    pub fn tick(&mut self) {
        self.flash *= 0.9;
        if self.flash < 0.02 { self.flash = 0.0; }
    }

    pub fn label(&self) -> &'static str { self.mode.label() }
    pub fn color(&self) -> u32 { mode_color(self.mode) }
}
