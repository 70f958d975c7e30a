//! Gesture classification and the anchor memory it governs.
//!
//! The mode is decided by hand count alone:
//!
//! | Hands | Mode |
//! |---|---|
//! | 0 | `Idle` |
//! | 1 | `Rotate`: the anchor's motion spins the orbit |
//! | 2 | `Zoom`: the anchors' spread changes the radius |
//! | 3+ | `Idle` (fallback; the controller drops such frames before this) |
//!
//! Each active mode keeps one baseline in [`TrackingCache`].  Leaving a mode
//! forgets its baseline, so re-entering it starts a fresh tracking session
//! instead of jumping by the distance travelled while it was inactive.

use std::fmt;

use hand_frame::HandFrame;

// ════════════════════════════════════════════════════════════════════════════
// GestureMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GestureMode {
    #[default]
    Idle,
    Rotate,
    Zoom,
}

impl GestureMode {
    /// Map a raw hand count onto a mode.  Counts above two fall back to
    /// `Idle`: with more hands than the gesture vocabulary covers there is
    /// no unambiguous pair to read.
    pub fn from_hand_count(n: usize) -> Self {
        match n {
            1 => GestureMode::Rotate,
            2 => GestureMode::Zoom,
            _ => GestureMode::Idle,
        }
    }

    /// Upper-case label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            GestureMode::Idle   => "IDLE",
            GestureMode::Rotate => "ROTATE",
            GestureMode::Zoom   => "ZOOM",
        }
    }
}

impl fmt::Display for GestureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decide the gesture for one detection frame.
pub fn classify(frame: &HandFrame) -> GestureMode {
    GestureMode::from_hand_count(frame.len())
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingCache
// ════════════════════════════════════════════════════════════════════════════

/// Per-session baselines for computing inter-frame deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackingCache {
    /// Anchor of the single hand on the previous ROTATE frame.
    pub last_single_hand_anchor: Option<(f64, f64)>,
    /// Anchor-to-anchor distance on the previous ZOOM frame.
    pub last_pinch_distance:     Option<f64>,
}

impl TrackingCache {
    /// Forget the baseline owned by `mode`.
    pub fn forget(&mut self, mode: GestureMode) {
        match mode {
            GestureMode::Rotate => self.last_single_hand_anchor = None,
            GestureMode::Zoom   => self.last_pinch_distance = None,
            GestureMode::Idle   => {}
        }
    }

    /// Apply the transition rule: when the mode changes, the previous
    /// mode's baseline is dropped.  Returns whether a transition happened.
    pub fn on_transition(&mut self, previous: GestureMode, next: GestureMode) -> bool {
        if previous == next {
            return false;
        }
        self.forget(previous);
        true
    }

    pub fn clear(&mut self) {
        *self = TrackingCache::default();
    }

    pub fn is_empty(&self) -> bool {
        self.last_single_hand_anchor.is_none() && self.last_pinch_distance.is_none()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
