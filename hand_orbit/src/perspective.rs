//! Perspective camera for the preview, driven through [`CameraSink`].

use glam::{DMat4, DVec3, DVec4};
use orbit_control::CameraSink;

pub const DEFAULT_FOV_DEG: f64 = 50.0;
pub const NEAR: f64 = 0.1;
pub const FAR:  f64 = 1000.0;

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    position: DVec3,
    target:   DVec3,
    fov_y:    f64,
    aspect:   f64,

    view:            DMat4,
    projection:      DMat4,
    view_projection: DMat4,
    projection_updates: u64,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f64, aspect: f64) -> Self {
        let mut cam = PerspectiveCamera {
            position: DVec3::new(0.0, 0.0, 5.0),
            target:   DVec3::ZERO,
            fov_y:    fov_deg.to_radians(),
            aspect,
            view:            DMat4::IDENTITY,
            projection:      DMat4::IDENTITY,
            view_projection: DMat4::IDENTITY,
            projection_updates: 0,
        };
        cam.rebuild();
        cam
    }

    fn rebuild(&mut self) {
        self.view = DMat4::look_at_rh(self.position, self.target, DVec3::Y);
        self.projection = DMat4::perspective_rh(self.fov_y, self.aspect, NEAR, FAR);
        self.view_projection = self.projection * self.view;
    }

    /// World point → pixel coordinates in a `width × height` viewport.
    /// `None` when the point is behind the camera or outside the depth range.
    pub fn project(&self, p: DVec3, width: usize, height: usize) -> Option<(f64, f64)> {
        let clip = self.view_projection * DVec4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some((
            (ndc.x + 1.0) * 0.5 * width as f64,
            (1.0 - ndc.y) * 0.5 * height as f64,
        ))
    }

    pub fn target(&self) -> DVec3 { self.target }
    pub fn projection_updates(&self) -> u64 { self.projection_updates }
}

impl CameraSink for PerspectiveCamera {
    fn position(&self) -> DVec3 { self.position }

    fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    fn look_at(&mut self, target: DVec3) {
        self.target = target;
        self.view = DMat4::look_at_rh(self.position, self.target, DVec3::Y);
    }

    fn update_projection(&mut self) {
        self.projection = DMat4::perspective_rh(self.fov_y, self.aspect, NEAR, FAR);
        self.view_projection = self.projection * self.view;
        self.projection_updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_control::{OrbitCameraModel, OrbitState};

    #[test]
    fn origin_lands_mid_viewport() {
        let cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, 2.0);
        let (x, y) = cam.project(DVec3::ZERO, 800, 400).unwrap();
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn up_is_up_on_screen() {
        let cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, 1.0);
        let (_, y) = cam.project(DVec3::new(0.0, 1.0, 0.0), 100, 100).unwrap();
        assert!(y < 50.0);
    }

    #[test]
    fn points_behind_are_culled() {
        let cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, 1.0);
        assert!(cam.project(DVec3::new(0.0, 0.0, 10.0), 100, 100).is_none());
    }

    #[test]
    fn orbit_model_drives_the_view() {
        let mut cam = PerspectiveCamera::new(DEFAULT_FOV_DEG, 1.0);
        let side = OrbitState { azimuth: std::f64::consts::FRAC_PI_2, ..OrbitState::default() };
        OrbitCameraModel::apply(&side, &mut cam);

        assert!((cam.position() - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-9);
        assert_eq!(cam.target(), DVec3::ZERO);
        assert_eq!(cam.projection_updates(), 1);

        // Still looking at the origin from the new side.
        let (x, _) = cam.project(DVec3::ZERO, 100, 100).unwrap();
        assert!((x - 50.0).abs() < 1e-9);
        // +z now lies to the left of the origin.
        let (zx, _) = cam.project(DVec3::new(0.0, 0.0, 1.0), 100, 100).unwrap();
        assert!(zx < 50.0);
    }
}
