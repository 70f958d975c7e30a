//! Error types for the tracker.
//!
//! [`DetectError`] (and [`hand_frame::FrameError`]) cost one frame and
//! never leave the tracker.  [`TrackerError`] disables the feature.

use thiserror::Error;

/// The detector could not produce a result for one frame.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("detection failed: {0}")]
pub struct DetectError(pub String);

impl DetectError {
    pub fn new(msg: impl Into<String>) -> Self {
        DetectError(msg.into())
    }
}

/// Failures that switch hand tracking off for the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    #[error("hand detector failed to initialise: {0}")]
    DetectorInit(String),

    #[error("video capture unavailable: {0}")]
    CaptureDenied(String),

    /// A previous start failed; tracking stays off.
    #[error("hand tracking is disabled after an earlier failure")]
    Disabled,

    #[error("hand tracking has been stopped")]
    Stopped,
}

impl TrackerError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TrackerError::DetectorInit(_) | TrackerError::CaptureDenied(_))
    }
}
