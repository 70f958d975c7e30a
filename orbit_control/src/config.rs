//! Tuning constants and the [`OrbitConfig`] that carries them.
//!
//! Defaults are the values the controller was tuned with.  A TOML file may
//! override any subset:
//!
//! ```toml
//! smoothing_factor = 0.2
//! max_zoom = 12.0
//! ```

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Fraction of the remaining distance covered per frame. Lower = smoother, more lag.
pub const SMOOTHING_FACTOR:  f64 = 0.1;
/// Multiplier on raw normalized hand motion before it becomes an angle.
pub const SENSITIVITY_POS:   f64 = 4.0;
/// Radius change per unit of pinch-distance change.
pub const ZOOM_GAIN:         f64 = 15.0;
pub const MIN_ZOOM:          f64 = 2.0;
pub const MAX_ZOOM:          f64 = 10.0;
pub const DEFAULT_RADIUS:    f64 = 5.0;
/// Keeps elevation inside `[ε, π − ε]` so the orbit never crosses a pole.
pub const ELEVATION_EPSILON: f64 = 0.1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the control loop can be tuned by.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbitConfig {
    pub smoothing_factor:  f64,
    pub sensitivity_pos:   f64,
    pub zoom_gain:         f64,
    pub min_zoom:          f64,
    pub max_zoom:          f64,
    pub default_radius:    f64,
    pub elevation_epsilon: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        OrbitConfig {
            smoothing_factor:  SMOOTHING_FACTOR,
            sensitivity_pos:   SENSITIVITY_POS,
            zoom_gain:         ZOOM_GAIN,
            min_zoom:          MIN_ZOOM,
            max_zoom:          MAX_ZOOM,
            default_radius:    DEFAULT_RADIUS,
            elevation_epsilon: ELEVATION_EPSILON,
        }
    }
}

impl OrbitConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: OrbitConfig = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return invalid(format!(
                "smoothing_factor must lie in (0, 1), got {}", self.smoothing_factor
            ));
        }
        for (name, v) in [("sensitivity_pos", self.sensitivity_pos), ("zoom_gain", self.zoom_gain)] {
            if !(v.is_finite() && v > 0.0) {
                return invalid(format!("{name} must be positive and finite, got {v}"));
            }
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return invalid(format!("min_zoom must be positive, got {}", self.min_zoom));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return invalid(format!(
                "max_zoom ({}) must be finite and >= min_zoom ({})", self.max_zoom, self.min_zoom
            ));
        }
        if !(self.default_radius >= self.min_zoom && self.default_radius <= self.max_zoom) {
            return invalid(format!(
                "default_radius {} outside [{}, {}]",
                self.default_radius, self.min_zoom, self.max_zoom
            ));
        }
        if !(self.elevation_epsilon > 0.0 && self.elevation_epsilon < FRAC_PI_2) {
            return invalid(format!(
                "elevation_epsilon must lie in (0, π/2), got {}", self.elevation_epsilon
            ));
        }
        Ok(())
    }

    /// Closed elevation range `[ε, π − ε]`.
    pub fn elevation_bounds(&self) -> (f64, f64) {
        (self.elevation_epsilon, std::f64::consts::PI - self.elevation_epsilon)
    }
}
