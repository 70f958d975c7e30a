//! Frame sources for the tracker: a mouse-driven simulator and a replay of
//! recorded detections.
//!
//! Both feed [`FrameImage`]s to [`FrameDetector`], so the tracker sees one
//! capture type and one detector type whichever source is active.
//!
//! ## Simulation
//!
//! The window samples the pointer every frame and sends a [`SimSnapshot`]
//! down an `mpsc` channel.  [`SimCapture`] plays the role of a webcam
//! running at half the display rate: it publishes a new, uniquely
//! timestamped frame every other tick and repeats the old one in between.
//!
//! | Input | Hands synthesised |
//! |---|---|
//! | left button held | one hand, anchor under the cursor (ROTATE) |
//! | right button held | two hands about the centre, spread by cursor x (ZOOM) |
//! | nothing | none (IDLE) |
//!
//! ## Replay
//!
//! JSON lines, one detection per line:
//!
//! ```text
//! {"time": 0.033, "hands": [[{"x":0.5,"y":0.5,"z":0.0}, ... 21 points], ...]}
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use hand_frame::{Hand, HandFrame, Landmark, FINGERS, LANDMARK_COUNT, WRIST};
use orbit_control::{CaptureSource, CapturedFrame, DetectError, HandDetector};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

// ════════════════════════════════════════════════════════════════════════════
// FrameImage: what a capture hands to the detector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum FrameImage {
    Pointer(SimSnapshot),
    Recorded(HandFrame),
}

/// Pointer state sampled from the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimSnapshot {
    /// Cursor position normalised to `[0, 1]`, image axes.
    pub cursor: (f32, f32),
    pub left:   bool,
    pub right:  bool,
}

// ════════════════════════════════════════════════════════════════════════════
// SimCapture
// ════════════════════════════════════════════════════════════════════════════

/// Simulated display rate of the tick loop.
pub const DISPLAY_FPS: f64 = 60.0;
/// Simulated webcam rate.
pub const CAMERA_FPS:  f64 = 30.0;

pub struct SimCapture {
    rx:        Receiver<SimSnapshot>,
    snapshot:  SimSnapshot,
    ticks:     u64,
    frames:    u64,
    shown:     Option<CapturedFrame<FrameImage>>,
    released:  bool,
}

impl SimCapture {
    pub fn new(rx: Receiver<SimSnapshot>) -> Self {
        SimCapture {
            rx,
            snapshot: SimSnapshot::default(),
            ticks:    0,
            frames:   0,
            shown:    None,
            released: false,
        }
    }

    fn ticks_per_frame() -> u64 {
        (DISPLAY_FPS / CAMERA_FPS).round().max(1.0) as u64
    }
}

impl CaptureSource for SimCapture {
    type Image = FrameImage;

    fn latest(&mut self) -> Option<CapturedFrame<FrameImage>> {
        if self.released {
            return None;
        }
        for snap in self.rx.try_iter() {
            self.snapshot = snap;
        }
        if self.ticks % Self::ticks_per_frame() == 0 {
            self.frames += 1;
            self.shown = Some(CapturedFrame {
                time:  self.frames as f64 / CAMERA_FPS,
                image: FrameImage::Pointer(self.snapshot),
            });
        }
        self.ticks += 1;
        self.shown.clone()
    }

    fn release(&mut self) {
        self.released = true;
        self.shown = None;
        debug!(frames = self.frames, "simulated capture released");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayCapture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} holds no frames")]
    Empty(PathBuf),
}

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    time: f64,
    #[serde(flatten)]
    frame: HandFrame,
}

/// Plays back a recorded detection log, one frame per tick, then holds
/// the last one.
pub struct ReplayCapture {
    frames: Vec<CapturedFrame<HandFrame>>,
    next:   usize,
}

impl ReplayCapture {
    pub fn open(path: &Path) -> Result<Self, ReplayError> {
        let raw = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let capture = Self::parse(&raw).map_err(|e| match e {
            ReplayError::Empty(_) => ReplayError::Empty(path.to_path_buf()),
            other => other,
        })?;
        info!(path = %path.display(), frames = capture.frame_count(), "replay loaded");
        Ok(capture)
    }

    pub fn parse(raw: &str) -> Result<Self, ReplayError> {
        let mut frames = Vec::new();
        for (i, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let rec: ReplayRecord = serde_json::from_str(line)
                .map_err(|source| ReplayError::Parse { line: i + 1, source })?;
            frames.push(CapturedFrame { time: rec.time, image: rec.frame });
        }
        if frames.is_empty() {
            return Err(ReplayError::Empty(PathBuf::from("<input>")));
        }
        Ok(ReplayCapture { frames, next: 0 })
    }

    /// Never zero: an empty log is rejected at parse time.
    pub fn frame_count(&self) -> usize { self.frames.len() }
    pub fn finished(&self) -> bool { self.next >= self.frames.len() }
}

impl CaptureSource for ReplayCapture {
    type Image = FrameImage;

    fn latest(&mut self) -> Option<CapturedFrame<FrameImage>> {
        let idx = self.next.min(self.frames.len().checked_sub(1)?);
        if self.next < self.frames.len() {
            self.next += 1;
        }
        let f = &self.frames[idx];
        Some(CapturedFrame { time: f.time, image: FrameImage::Recorded(f.image.clone()) })
    }

    fn release(&mut self) {
        self.next = self.frames.len();
        self.frames.clear();
        debug!("replay released");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Capture: whichever source the app was started with
// ════════════════════════════════════════════════════════════════════════════

pub enum Capture {
    Sim(SimCapture),
    Replay(ReplayCapture),
}

impl CaptureSource for Capture {
    type Image = FrameImage;

    fn latest(&mut self) -> Option<CapturedFrame<FrameImage>> {
        match self {
            Capture::Sim(c)    => c.latest(),
            Capture::Replay(c) => c.latest(),
        }
    }

    fn release(&mut self) {
        match self {
            Capture::Sim(c)    => c.release(),
            Capture::Replay(c) => c.release(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameDetector
// ════════════════════════════════════════════════════════════════════════════

/// Stands in for the landmark model: synthesises hands from pointer
/// snapshots and passes recorded detections through.
#[derive(Debug, Default)]
pub struct FrameDetector {
    detections: u64,
    last:       HandFrame,
}

impl FrameDetector {
    pub fn detections(&self) -> u64 { self.detections }

    /// Hands from the most recent detection, for the preview skeleton.
    pub fn last_hands(&self) -> &HandFrame { &self.last }
}

impl HandDetector<FrameImage> for FrameDetector {
    fn detect(&mut self, image: &FrameImage, _timestamp_ms: f64) -> Result<HandFrame, DetectError> {
        self.detections += 1;
        self.last = match image {
            FrameImage::Recorded(frame) => frame.clone(),
            FrameImage::Pointer(snap)   => synthesize(snap),
        };
        Ok(self.last.clone())
    }
}

/// Hands implied by a pointer snapshot.
pub fn synthesize(snap: &SimSnapshot) -> HandFrame {
    let (cx, cy) = snap.cursor;
    if snap.left {
        HandFrame::new(vec![synth_hand(cx, cy)])
    } else if snap.right {
        let spread = (cx - 0.5).abs() * 2.0;
        HandFrame::new(vec![
            synth_hand(0.5 - spread / 2.0, 0.5),
            synth_hand(0.5 + spread / 2.0, 0.5),
        ])
    } else {
        HandFrame::empty()
    }
}

/// Upright open palm whose middle-finger base sits exactly at `(ax, ay)`.
pub fn synth_hand(ax: f32, ay: f32) -> Hand {
    // Base-joint offsets from the anchor and per-joint step, thumb → pinky.
    const BASES: [(f32, f32); 5] = [
        (-0.070, 0.070), (-0.035, 0.005), (0.0, 0.0), (0.035, 0.005), (0.065, 0.025),
    ];
    const STEPS: [(f32, f32); 5] = [
        (-0.025, -0.020), (-0.004, -0.030), (0.0, -0.032), (0.004, -0.030), (0.008, -0.025),
    ];

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    pts[WRIST] = Landmark::new(ax, ay + 0.12, 0.0);
    for (f, chain) in FINGERS.iter().enumerate() {
        let (bx, by) = BASES[f];
        let (sx, sy) = STEPS[f];
        for (j, &idx) in chain.iter().enumerate() {
            let j = j as f32;
            pts[idx] = Landmark::new(ax + bx + sx * j, ay + by + sy * j, -0.01 * (j + 1.0));
        }
    }
    Hand::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
