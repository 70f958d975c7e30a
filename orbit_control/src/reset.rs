//! Returning the orbit to its home position.

use crate::config::OrbitConfig;
use crate::gesture::{GestureMode, TrackingCache};
use crate::orbit::{OrbitCurrent, OrbitState, OrbitTarget};

/// Snap both target and current to home with no smoothing and forget every
/// gesture baseline.  Returns the mode the caller should now report.
///
/// Calling it twice is the same as calling it once.
pub fn reset(
    target:  &mut OrbitTarget,
    current: &mut OrbitCurrent,
    cache:   &mut TrackingCache,
    cfg:     &OrbitConfig,
) -> GestureMode {
    let home = OrbitState::home(cfg);
    *target  = home;
    *current = home;
    cache.clear();
    GestureMode::Idle
}
