//! Placing a camera on the orbit sphere.
//!
//! Physics convention, Y up: elevation `φ` is measured from +Y, azimuth `θ`
//! around Y starting at +Z.
//!
//! ```text
//! x = r · sin φ · sin θ
//! y = r · cos φ
//! z = r · sin φ · cos θ
//! ```
//!
//! so the home orbit (`φ = π/2, θ = 0, r = 5`) sits at `(0, 0, 5)` looking
//! down -Z at the origin.

use glam::DVec3;

use crate::orbit::OrbitCurrent;

/// The point every orbit camera looks at.
pub const ORIGIN: DVec3 = DVec3::ZERO;

/// A camera owned by the rendering side.  The controller only writes to it.
pub trait CameraSink {
    fn position(&self) -> DVec3;
    fn set_position(&mut self, position: DVec3);
    /// Orient the camera so it faces `target`.
    fn look_at(&mut self, target: DVec3);
    /// Recompute any cached projection/view data after a move.
    fn update_projection(&mut self);
}

/// Spherical `(radius, elevation, azimuth)` → Cartesian.
pub fn spherical_to_cartesian(radius: f64, elevation: f64, azimuth: f64) -> DVec3 {
    let (sin_phi, cos_phi)     = elevation.sin_cos();
    let (sin_theta, cos_theta) = azimuth.sin_cos();
    DVec3::new(
        radius * sin_phi * sin_theta,
        radius * cos_phi,
        radius * sin_phi * cos_theta,
    )
}

/// Maps the smoothed orbit onto a [`CameraSink`].
pub struct OrbitCameraModel;

impl OrbitCameraModel {
    pub fn position(current: &OrbitCurrent) -> DVec3 {
        spherical_to_cartesian(current.radius, current.elevation, current.azimuth)
    }

    /// Move the camera onto the orbit, aim it at the origin, refresh projection.
    pub fn apply<C: CameraSink + ?Sized>(current: &OrbitCurrent, camera: &mut C) {
        camera.set_position(Self::position(current));
        camera.look_at(ORIGIN);
        camera.update_projection();
    }
}
