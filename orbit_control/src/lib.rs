//! # orbit_control
//!
//! Touchless orbit-camera control from hand-skeleton detections.
//!
//! ## Gesture → camera mapping
//!
//! | Hands | Mode | Effect |
//! |---|---|---|
//! | 0 | IDLE | nothing new; the camera glides to rest on its last target |
//! | 1 | ROTATE | anchor motion → azimuth / elevation |
//! | 2 | ZOOM | change in anchor spread → orbit radius |
//!
//! ## Pipeline per detection frame
//!
//! ```text
//! HandFrame ─► classify ─► accumulate (target) ─► smooth (current) ─► camera
//! ```
//!
//! [`OrbitController`] runs that pipeline on demand; [`HandTracker`] wraps
//! it in the frame-clock loop (unique-timestamp gating, queued resets,
//! start-up failures, teardown).
//!
//! ## Quick start
//!
//! ```rust
//! use orbit_control::{CameraSink, OrbitController};
//! use hand_frame::{HandFrame, LANDMARK_COUNT};
//! use glam::DVec3;
//!
//! struct Cam(DVec3);
//! impl CameraSink for Cam {
//!     fn position(&self) -> DVec3 { self.0 }
//!     fn set_position(&mut self, p: DVec3) { self.0 = p; }
//!     fn look_at(&mut self, _target: DVec3) {}
//!     fn update_projection(&mut self) {}
//! }
//!
//! let mut ctl = OrbitController::default();
//! let mut cam = Cam(DVec3::ZERO);
//! let frame = HandFrame::from_flat(&vec![0.5; LANDMARK_COUNT * 3], 1).unwrap();
//! ctl.process(&frame, &mut cam).unwrap();
//! assert!((cam.0.z - 5.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod orbit;
pub mod gesture;
pub mod accumulate;
pub mod smoother;
pub mod camera;
pub mod reset;
pub mod controller;
pub mod error;
pub mod tracker;

pub use config::{
    ConfigError, OrbitConfig,
    SMOOTHING_FACTOR, SENSITIVITY_POS, ZOOM_GAIN, MIN_ZOOM, MAX_ZOOM,
    DEFAULT_RADIUS, ELEVATION_EPSILON,
};
pub use orbit::{OrbitState, OrbitTarget, OrbitCurrent};
pub use gesture::{classify, GestureMode, TrackingCache};
pub use accumulate::{Motion, MotionAccumulator};
pub use smoother::Smoother;
pub use camera::{spherical_to_cartesian, CameraSink, OrbitCameraModel, ORIGIN};
pub use controller::OrbitController;
pub use error::{DetectError, TrackerError};
pub use tracker::{
    CaptureSource, CapturedFrame, GestureSink, HandDetector, HandTracker,
    ResetHandle, TickOutcome, TrackerCommand, TrackerState,
};
