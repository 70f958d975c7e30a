//! Top-level application loop.
//!
//! `AppState` keeps what the overlay shows (gesture badge, tick counters,
//! status line, tracking health).  `run` owns the window, the tracker and
//! the preview camera and drives one tick per displayed frame.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{anyhow, Result};
use hand_frame::HandFrame;
use orbit_control::{
    GestureMode, HandTracker, OrbitConfig, TickOutcome, TrackerError,
};
use tracing::{info, warn};

use crate::perspective::{PerspectiveCamera, DEFAULT_FOV_DEG};
use crate::scene::{GestureBadge, Scene};
use crate::source::{Capture, FrameDetector, ReplayCapture, SimCapture, SimSnapshot};
use crate::visualizer::{Overlay, Visualizer, PREVIEW_H, PREVIEW_W};

pub type Tracker = HandTracker<Capture, FrameDetector>;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    /// Mouse-driven hand simulator.
    Simulated,
    /// JSON-lines detection log.
    Replay(PathBuf),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub orbit:   OrbitConfig,
    pub source:  SourceKind,
    pub fov_deg: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            orbit:   OrbitConfig::default(),
            source:  SourceKind::Simulated,
            fov_deg: DEFAULT_FOV_DEG,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum Tracking {
    Starting,
    Running,
    /// Start-up failed; the preview stays up without hand control.
    Unavailable(String),
    Stopped,
}

impl Tracking {
    pub fn describe(&self) -> String {
        match self {
            Tracking::Starting       => "starting".to_string(),
            Tracking::Running        => "running".to_string(),
            Tracking::Unavailable(e) => format!("unavailable: {e}"),
            Tracking::Stopped        => "stopped".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub badge:     GestureBadge,
    pub tracking:  Tracking,
    pub status:    String,
    pub processed: u64,
    pub skipped:   u64,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            badge:     GestureBadge::default(),
            tracking:  Tracking::Starting,
            status:    "Ready".to_string(),
            processed: 0,
            skipped:   0,
        }
    }
}

impl AppState {
    /// Gesture sink: the mode of each processed frame, and of every reset.
    pub fn show_gesture(&mut self, mode: GestureMode) {
        self.badge.show(mode);
    }

    pub fn started(&mut self, result: &Result<(), TrackerError>) {
        match result {
            Ok(()) => {
                self.tracking = Tracking::Running;
                self.status = "Tracking - show one hand to rotate, two to zoom".to_string();
            }
            Err(e) => {
                self.tracking = Tracking::Unavailable(e.to_string());
                self.status = "Hand tracking unavailable".to_string();
            }
        }
    }

    pub fn record(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Processed(mode) => {
                self.processed += 1;
                self.status = match mode {
                    GestureMode::Idle   => format!("Idle  frames={}", self.processed),
                    GestureMode::Rotate => format!("Rotating  frames={}", self.processed),
                    GestureMode::Zoom   => format!("Zooming  frames={}", self.processed),
                };
            }
            TickOutcome::Skipped => {
                self.skipped += 1;
                self.status = format!("Frame skipped  ({} so far)", self.skipped);
            }
            TickOutcome::Stopped => self.tracking = Tracking::Stopped,
            TickOutcome::Held | TickOutcome::Inactive => {}
        }
    }

    pub fn tick(&mut self) {
        self.badge.tick();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Start-up
// ════════════════════════════════════════════════════════════════════════════

/// Bring up detector and capture for `source`.  Failure leaves the tracker
/// disabled; the caller keeps going without hand control.
pub fn start_tracking(
    tracker: &mut Tracker,
    source:  &SourceKind,
    sim_rx:  mpsc::Receiver<SimSnapshot>,
) -> Result<(), TrackerError> {
    tracker.start(
        || Ok::<_, Infallible>(FrameDetector::default()),
        || match source {
            SourceKind::Simulated    => Ok(Capture::Sim(SimCapture::new(sim_rx))),
            SourceKind::Replay(path) => ReplayCapture::open(path).map(Capture::Replay),
        },
    )
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Pointer channel: window → simulated capture ───────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimSnapshot>();

    let mut vis = Visualizer::new(sim_tx).map_err(|e| anyhow!("cannot open window: {e}"))?;

    let mut tracker = Tracker::new(cfg.orbit);
    let mut app = AppState::default();
    let mut camera = PerspectiveCamera::new(cfg.fov_deg, PREVIEW_W as f64 / PREVIEW_H as f64);
    let scene = Scene::default();
    let no_hands = HandFrame::empty();

    let started = start_tracking(&mut tracker, &cfg.source, sim_rx);
    if let Err(e) = &started {
        warn!(error = %e, "continuing without hand control");
    }
    app.started(&started);

    vis.bind_reset(tracker.reset_handle());
    tracker.reset(&mut camera, &mut |m: GestureMode| app.show_gesture(m));

    info!(source = ?cfg.source, "preview running");

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() { break; }

        let outcome = tracker.tick(&mut camera, &mut |m: GestureMode| app.show_gesture(m));
        app.record(outcome);
        app.tick();

        let tracking = app.tracking.describe();
        let ctl = tracker.controller();
        let hands = tracker.detector().map_or(&no_hands, FrameDetector::last_hands);
        vis.render(
            &scene,
            &camera,
            &Overlay {
                badge:    &app.badge,
                target:   ctl.target(),
                current:  ctl.current(),
                tracking: &tracking,
                status:   &app.status,
                hands,
            },
        );
    }

    tracker.stop();
    info!(processed = app.processed, skipped = app.skipped, "preview closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
