//! Orbital parameters: the record the camera rides on.
//!
//! The controller keeps two of these.  The *target* is where gestures say
//! the camera should be; the *current* is where it actually is, trailing
//! the target through the smoother.

use std::f64::consts::FRAC_PI_2;

use crate::config::OrbitConfig;

/// Spherical camera parameters around the scene origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitState {
    /// Angle around the vertical axis, radians. Unbounded.
    pub azimuth:   f64,
    /// Polar angle from the +Y axis, radians. Kept in `[ε, π − ε]`.
    pub elevation: f64,
    /// Distance from the origin. Kept in `[min_zoom, max_zoom]`.
    pub radius:    f64,
}

/// Where gestures want the camera.
pub type OrbitTarget = OrbitState;

/// The smoothed state actually applied to the camera.
pub type OrbitCurrent = OrbitState;

impl OrbitState {
    /// On the equator, facing down -Z, at `default_radius`.
    pub fn home(cfg: &OrbitConfig) -> Self {
        OrbitState {
            azimuth:   0.0,
            elevation: FRAC_PI_2,
            radius:    cfg.default_radius,
        }
    }

    /// Pull elevation and radius back inside their bounds.
    pub fn clamp(&mut self, cfg: &OrbitConfig) {
        let (lo, hi) = cfg.elevation_bounds();
        self.elevation = self.elevation.clamp(lo, hi);
        self.radius    = self.radius.clamp(cfg.min_zoom, cfg.max_zoom);
    }

    pub fn within_bounds(&self, cfg: &OrbitConfig) -> bool {
        let (lo, hi) = cfg.elevation_bounds();
        (lo..=hi).contains(&self.elevation)
            && (cfg.min_zoom..=cfg.max_zoom).contains(&self.radius)
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        OrbitState::home(&OrbitConfig::default())
    }
}
