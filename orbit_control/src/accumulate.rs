//! Turning inter-frame hand motion into target orbit changes.
//!
//! # ROTATE (one hand)
//!
//! The anchor's displacement since the previous frame, scaled by
//! `sensitivity_pos`, becomes an angle:
//!
//! ```text
//! azimuth   -= Δx · 2π      (hand moves right → azimuth falls)
//! elevation -= Δy · π       (hand moves down  → elevation falls)
//! ```
//!
//! Elevation is clamped to `[ε, π − ε]` straight away.
//!
//! # ZOOM (two hands)
//!
//! `radius += (previous_spread − spread) · zoom_gain`, clamped to the zoom
//! range.  Hands moving together push the camera out.
//!
//! In both modes the first frame of a session only records a baseline.

use std::f64::consts::{PI, TAU};

use hand_frame::{planar_distance, HandFrame};

use crate::config::OrbitConfig;
use crate::gesture::{GestureMode, TrackingCache};
use crate::orbit::OrbitTarget;

/// What one frame did to the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Nothing to do (idle, or the frame did not fit the mode).
    None,
    /// First frame of a session: baseline stored, target untouched.
    Baseline,
    Rotated { d_azimuth: f64, d_elevation: f64 },
    Zoomed  { d_radius: f64 },
}

/// Applies gesture deltas to an [`OrbitTarget`].
#[derive(Clone, Copy, Debug)]
pub struct MotionAccumulator {
    cfg: OrbitConfig,
}

impl MotionAccumulator {
    pub fn new(cfg: OrbitConfig) -> Self {
        MotionAccumulator { cfg }
    }

    /// Update `target` from one already-validated frame.
    ///
    /// `mode` must be the classification of `hands`; a frame whose hand count
    /// does not match the mode is ignored.  Coordinates are assumed finite.
    pub fn accumulate(
        &self,
        mode:   GestureMode,
        hands:  &HandFrame,
        target: &mut OrbitTarget,
        cache:  &mut TrackingCache,
    ) -> Motion {
        match (mode, hands.hands()) {
            (GestureMode::Rotate, [hand]) => {
                let p = hand.anchor().xy();
                let motion = match cache.last_single_hand_anchor {
                    None => Motion::Baseline,
                    Some(last) => self.rotate(target, p, last),
                };
                cache.last_single_hand_anchor = Some(p);
                motion
            }

            (GestureMode::Zoom, [a, b]) => {
                let d = planar_distance(&a.anchor(), &b.anchor());
                let motion = match cache.last_pinch_distance {
                    None => Motion::Baseline,
                    Some(prev) => self.zoom(target, prev, d),
                };
                cache.last_pinch_distance = Some(d);
                motion
            }

            _ => Motion::None,
        }
    }

    fn rotate(&self, target: &mut OrbitTarget, p: (f64, f64), last: (f64, f64)) -> Motion {
        let dx = (p.0 - last.0) * self.cfg.sensitivity_pos;
        let dy = (p.1 - last.1) * self.cfg.sensitivity_pos;

        let before = *target;
        target.azimuth   -= dx * TAU;
        target.elevation -= dy * PI;

        let (lo, hi) = self.cfg.elevation_bounds();
        target.elevation = target.elevation.clamp(lo, hi);

        Motion::Rotated {
            d_azimuth:   target.azimuth - before.azimuth,
            d_elevation: target.elevation - before.elevation,
        }
    }

    fn zoom(&self, target: &mut OrbitTarget, prev: f64, d: f64) -> Motion {
        let before = target.radius;
        let delta = prev - d;
        target.radius = (target.radius + delta * self.cfg.zoom_gain)
            .clamp(self.cfg.min_zoom, self.cfg.max_zoom);
        Motion::Zoomed { d_radius: target.radius - before }
    }
}

impl Default for MotionAccumulator {
    fn default() -> Self {
        MotionAccumulator::new(OrbitConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::classify;
    use crate::orbit::OrbitState;
    use hand_frame::{Hand, Landmark, ANCHOR, LANDMARK_COUNT};

    fn hand_at(x: f32, y: f32) -> Hand {
        let mut pts = [Landmark::new(0.5, 0.9, 0.0); LANDMARK_COUNT];
        pts[ANCHOR] = Landmark::new(x, y, 0.0);
        Hand::new(pts)
    }

    fn one(x: f32, y: f32) -> HandFrame {
        HandFrame::new(vec![hand_at(x, y)])
    }

    fn two(spread: f32) -> HandFrame {
        HandFrame::new(vec![hand_at(0.5 - spread / 2.0, 0.5), hand_at(0.5 + spread / 2.0, 0.5)])
    }

    fn feed(acc: &MotionAccumulator, f: &HandFrame, t: &mut OrbitState, c: &mut TrackingCache) -> Motion {
        acc.accumulate(classify(f), f, t, c)
    }

    #[test]
    fn first_rotate_frame_is_baseline_only() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        assert_eq!(feed(&acc, &one(0.5, 0.5), &mut target, &mut cache), Motion::Baseline);
        assert_eq!(target, OrbitState::default());
        assert_eq!(cache.last_single_hand_anchor, Some((0.5, 0.5)));
    }

    #[test]
    fn rightward_motion_lowers_azimuth() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &one(0.5, 0.5), &mut target, &mut cache);
        feed(&acc, &one(0.6, 0.5), &mut target, &mut cache);

        let expected = -(0.6_f32 as f64 - 0.5) * 4.0 * TAU;
        assert!((target.azimuth - expected).abs() < 1e-12);
        assert!((target.azimuth + 2.5133).abs() < 1e-3);
        assert_eq!(target.elevation, PI / 2.0);
    }

    #[test]
    fn downward_motion_lowers_elevation() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &one(0.5, 0.50), &mut target, &mut cache);
        let m = feed(&acc, &one(0.5, 0.55), &mut target, &mut cache);

        match m {
            Motion::Rotated { d_azimuth, d_elevation } => {
                assert_eq!(d_azimuth, 0.0);
                assert!(d_elevation < 0.0);
            }
            other => panic!("expected rotation, got {other:?}"),
        }
    }

    #[test]
    fn elevation_clamps_exactly_at_epsilon() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &one(0.5, 0.1), &mut target, &mut cache);
        for i in 1..=8 {
            feed(&acc, &one(0.5, 0.1 + 0.1 * i as f32), &mut target, &mut cache);
        }
        assert_eq!(target.elevation, 0.1);
    }

    #[test]
    fn elevation_clamps_at_upper_pole() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &one(0.5, 0.9), &mut target, &mut cache);
        feed(&acc, &one(0.5, 0.1), &mut target, &mut cache);
        assert_eq!(target.elevation, PI - 0.1);
    }

    #[test]
    fn pinch_baseline_then_zoom_out() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        assert_eq!(feed(&acc, &two(0.30), &mut target, &mut cache), Motion::Baseline);
        assert_eq!(target.radius, 5.0);

        feed(&acc, &two(0.20), &mut target, &mut cache);
        assert!((target.radius - 6.5).abs() < 1e-5);
    }

    #[test]
    fn spreading_hands_zooms_in_and_clamps() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &two(0.1), &mut target, &mut cache);
        feed(&acc, &two(0.9), &mut target, &mut cache);
        assert_eq!(target.radius, 2.0);
    }

    #[test]
    fn zoom_clamps_at_max() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &two(0.9), &mut target, &mut cache);
        feed(&acc, &two(0.05), &mut target, &mut cache);
        assert_eq!(target.radius, 10.0);
    }

    #[test]
    fn zoom_does_not_touch_angles() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState { azimuth: 1.0, elevation: 1.2, radius: 5.0 };
        let mut cache = TrackingCache::default();

        feed(&acc, &two(0.3), &mut target, &mut cache);
        feed(&acc, &two(0.25), &mut target, &mut cache);
        assert_eq!((target.azimuth, target.elevation), (1.0, 1.2));
    }

    #[test]
    fn idle_changes_nothing() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        assert_eq!(feed(&acc, &HandFrame::empty(), &mut target, &mut cache), Motion::None);
        assert_eq!(target, OrbitState::default());
        assert!(cache.is_empty());
    }

    #[test]
    fn mismatched_mode_is_ignored() {
        let acc = MotionAccumulator::default();
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        let m = acc.accumulate(GestureMode::Zoom, &one(0.5, 0.5), &mut target, &mut cache);
        assert_eq!(m, Motion::None);
        assert!(cache.is_empty());
    }

    #[test]
    fn sensitivity_scales_rotation() {
        let cfg = OrbitConfig { sensitivity_pos: 2.0, ..OrbitConfig::default() };
        let acc = MotionAccumulator::new(cfg);
        let mut target = OrbitState::default();
        let mut cache = TrackingCache::default();

        feed(&acc, &one(0.25, 0.5), &mut target, &mut cache);
        feed(&acc, &one(0.5, 0.5), &mut target, &mut cache);
        assert!((target.azimuth + 0.25 * 2.0 * TAU).abs() < 1e-12);
    }
}
