//! `HandTracker`: the frame-clock-driven loop around [`OrbitController`].
//!
//! The host calls [`HandTracker::tick`] from its presentation callback
//! (~60 Hz).  A tick does real work only when the capture has a frame with a
//! timestamp not seen before; otherwise the camera simply holds.  Everything
//! for one frame (detect, classify, accumulate, smooth, apply) completes
//! inside that single call.
//!
//! Resets requested from elsewhere (another thread, a UI callback) go
//! through a [`ResetHandle`] and are applied at the start of the next tick,
//! so they never interleave with a frame half-way through the pipeline.
//!
//! ```text
//!   ResetHandle ──mpsc──┐
//!                       ▼
//!   tick() ─► drain commands ─► capture.latest() ─► new time? ─► detect
//!                                                      │ no         │
//!                                                    Held     OrbitController
//!                                                                   │
//!                                                         camera + gesture sink
//! ```

use std::sync::mpsc::{self, Receiver, Sender};

use hand_frame::HandFrame;
use tracing::{debug, error, info, warn};

use crate::camera::CameraSink;
use crate::config::OrbitConfig;
use crate::controller::OrbitController;
use crate::error::{DetectError, TrackerError};
use crate::gesture::GestureMode;

// ════════════════════════════════════════════════════════════════════════════
// External collaborators
// ════════════════════════════════════════════════════════════════════════════

/// One video frame as handed out by a capture source.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedFrame<I> {
    /// Presentation time in seconds.  Equal times mean the same frame.
    pub time:  f64,
    pub image: I,
}

/// A video source (webcam, file, simulator).
pub trait CaptureSource {
    type Image;

    /// The frame currently on display, if the source has one yet.
    fn latest(&mut self) -> Option<CapturedFrame<Self::Image>>;

    /// Stop capturing and free the device.  Called exactly once.
    fn release(&mut self);
}

/// Hand-landmark detection: a black box to the controller.
pub trait HandDetector<I> {
    fn detect(&mut self, image: &I, timestamp_ms: f64) -> Result<HandFrame, DetectError>;
}

/// Receives the mode of every processed frame, for display only.
pub trait GestureSink {
    fn show_gesture(&mut self, mode: GestureMode);
}

impl<F: FnMut(GestureMode)> GestureSink for F {
    fn show_gesture(&mut self, mode: GestureMode) {
        self(mode)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerCommand {
    Reset,
}

/// Cloneable, `Send` trigger for resetting the view from outside the tick.
#[derive(Clone, Debug)]
pub struct ResetHandle {
    tx: Sender<TrackerCommand>,
}

impl ResetHandle {
    /// Queue a reset.  Returns false if the tracker no longer exists.
    pub fn reset(&self) -> bool {
        self.tx.send(TrackerCommand::Reset).is_ok()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    /// Built but not started.
    Idle,
    Running,
    /// A fatal start error occurred; tracking is off for good.
    Disabled,
    /// Torn down; the capture has been released.
    Stopped,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new frame went through the whole pipeline.
    Processed(GestureMode),
    /// No new frame since the last tick; nothing changed.
    Held,
    /// A new frame arrived but was unusable and was dropped.
    Skipped,
    /// Not running (never started, or disabled).
    Inactive,
    Stopped,
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker
// ════════════════════════════════════════════════════════════════════════════

pub struct HandTracker<C: CaptureSource, D> {
    controller: OrbitController,
    capture:    Option<C>,
    detector:   Option<D>,
    state:      TrackerState,
    last_time:  Option<f64>,

    commands_tx: Sender<TrackerCommand>,
    commands_rx: Receiver<TrackerCommand>,
}

impl<C, D> HandTracker<C, D>
where
    C: CaptureSource,
    D: HandDetector<C::Image>,
{
    pub fn new(cfg: OrbitConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel();
        HandTracker {
            controller: OrbitController::new(cfg),
            capture:    None,
            detector:   None,
            state:      TrackerState::Idle,
            last_time:  None,
            commands_tx,
            commands_rx,
        }
    }

    /// Bring up the detector, then the capture.
    ///
    /// A failure in either is reported once and leaves the tracker
    /// [`TrackerState::Disabled`]; later calls return
    /// [`TrackerError::Disabled`] without retrying.
    pub fn start<OD, OC, ED, EC>(&mut self, open_detector: OD, open_capture: OC) -> Result<(), TrackerError>
    where
        OD: FnOnce() -> Result<D, ED>,
        OC: FnOnce() -> Result<C, EC>,
        ED: std::fmt::Display,
        EC: std::fmt::Display,
    {
        match self.state {
            TrackerState::Running  => return Ok(()),
            TrackerState::Disabled => return Err(TrackerError::Disabled),
            TrackerState::Stopped  => return Err(TrackerError::Stopped),
            TrackerState::Idle     => {}
        }

        let detector = match open_detector() {
            Ok(d) => d,
            Err(e) => return Err(self.disable(TrackerError::DetectorInit(e.to_string()))),
        };
        let capture = match open_capture() {
            Ok(c) => c,
            Err(e) => return Err(self.disable(TrackerError::CaptureDenied(e.to_string()))),
        };

        self.detector = Some(detector);
        self.capture  = Some(capture);
        self.state    = TrackerState::Running;
        info!("hand tracking started");
        Ok(())
    }

    fn disable(&mut self, err: TrackerError) -> TrackerError {
        error!(%err, "hand tracking disabled");
        self.state = TrackerState::Disabled;
        err
    }

    /// One scheduler callback.  See the module docs for the sequence.
    pub fn tick<K, G>(&mut self, camera: &mut K, gestures: &mut G) -> TickOutcome
    where
        K: CameraSink + ?Sized,
        G: GestureSink + ?Sized,
    {
        if self.state == TrackerState::Stopped {
            return TickOutcome::Stopped;
        }

        while let Ok(cmd) = self.commands_rx.try_recv() {
            match cmd {
                TrackerCommand::Reset => self.reset(&mut *camera, &mut *gestures),
            }
        }

        if self.state != TrackerState::Running {
            return TickOutcome::Inactive;
        }
        let (Some(capture), Some(detector)) = (self.capture.as_mut(), self.detector.as_mut()) else {
            return TickOutcome::Inactive;
        };

        let Some(frame) = capture.latest() else {
            return TickOutcome::Held;
        };
        if self.last_time.is_some_and(|t| same_instant(t, frame.time)) {
            return TickOutcome::Held;
        }
        self.last_time = Some(frame.time);

        if !frame.time.is_finite() {
            warn!(time = frame.time, "frame skipped: timestamp is not finite");
            return TickOutcome::Skipped;
        }

        let hands = match detector.detect(&frame.image, frame.time * 1000.0) {
            Ok(h) => h,
            Err(e) => {
                warn!(time = frame.time, error = %e, "frame skipped");
                return TickOutcome::Skipped;
            }
        };

        match self.controller.process(&hands, camera) {
            Ok(mode) => {
                gestures.show_gesture(mode);
                TickOutcome::Processed(mode)
            }
            Err(e) => {
                warn!(time = frame.time, error = %e, "frame skipped");
                TickOutcome::Skipped
            }
        }
    }

    /// Reset immediately: home orbit, empty caches, camera re-applied and
    /// `Idle` reported.
    pub fn reset<K, G>(&mut self, camera: &mut K, gestures: &mut G)
    where
        K: CameraSink + ?Sized,
        G: GestureSink + ?Sized,
    {
        let mode = self.controller.reset();
        self.controller.apply_camera(camera);
        gestures.show_gesture(mode);
    }

    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle { tx: self.commands_tx.clone() }
    }

    pub fn state(&self)      -> TrackerState     { self.state }
    pub fn controller(&self) -> &OrbitController { &self.controller }
    /// `None` unless running.
    pub fn detector(&self)   -> Option<&D>       { self.detector.as_ref() }
    pub fn is_running(&self) -> bool             { self.state == TrackerState::Running }
}

/// Equal times, or the very same non-finite value (NaN never equals itself).
fn same_instant(a: f64, b: f64) -> bool {
    a == b || a.to_bits() == b.to_bits()
}

impl<C: CaptureSource, D> HandTracker<C, D> {
    /// Tear down: release the capture and refuse further ticks.
    pub fn stop(&mut self) {
        if self.state == TrackerState::Stopped {
            return;
        }
        if let Some(mut capture) = self.capture.take() {
            capture.release();
            debug!("capture released");
        }
        self.detector = None;
        self.state = TrackerState::Stopped;
        info!("hand tracking stopped");
    }
}

impl<C: CaptureSource, D> Drop for HandTracker<C, D> {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
