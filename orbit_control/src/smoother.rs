//! Exponential smoothing of the applied orbit toward its target.
//!
//! Each channel moves `factor` of the remaining gap per processed frame,
//! so a fixed target is approached geometrically: after `n` steps the
//! error is `(1 − factor)ⁿ` of what it was.

use crate::config::OrbitConfig;
use crate::orbit::{OrbitCurrent, OrbitTarget};

/// One smoothing step on all three channels, without re-clamping.
pub fn advance(current: &mut OrbitCurrent, target: &OrbitTarget, factor: f64) {
    current.azimuth   += (target.azimuth   - current.azimuth)   * factor;
    current.elevation += (target.elevation - current.elevation) * factor;
    current.radius    += (target.radius    - current.radius)    * factor;
}

/// Smoothing step bound to a config: advances, then re-clamps so rounding
/// never carries the applied state outside the orbit bounds.
#[derive(Clone, Copy, Debug)]
pub struct Smoother {
    cfg: OrbitConfig,
}

impl Smoother {
    pub fn new(cfg: OrbitConfig) -> Self {
        Smoother { cfg }
    }

    pub fn advance(&self, current: &mut OrbitCurrent, target: &OrbitTarget) {
        advance(current, target, self.cfg.smoothing_factor);
        current.clamp(&self.cfg);
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Smoother::new(OrbitConfig::default())
    }
}
