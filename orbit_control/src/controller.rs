//! `OrbitController`: the per-frame pipeline.
//!
//! Owns the target and current orbits and the tracking cache.  For every
//! detection frame it runs, in order:
//!
//! 1. validation (a bad frame changes nothing at all),
//! 2. classification, dropping the previous mode's baseline on a change,
//! 3. motion accumulation into the target,
//! 4. one smoothing step of current toward target,
//! 5. projection of current onto the camera.

use hand_frame::{FrameError, HandFrame};
use tracing::{debug, info, trace};

use crate::accumulate::{Motion, MotionAccumulator};
use crate::camera::{CameraSink, OrbitCameraModel};
use crate::config::OrbitConfig;
use crate::gesture::{classify, GestureMode, TrackingCache};
use crate::orbit::{OrbitCurrent, OrbitState, OrbitTarget};
use crate::reset;
use crate::smoother::Smoother;

pub struct OrbitController {
    cfg:         OrbitConfig,
    accumulator: MotionAccumulator,
    smoother:    Smoother,

    target:  OrbitTarget,
    current: OrbitCurrent,
    cache:   TrackingCache,
    mode:    GestureMode,
}

impl OrbitController {
    pub fn new(cfg: OrbitConfig) -> Self {
        let home = OrbitState::home(&cfg);
        OrbitController {
            cfg,
            accumulator: MotionAccumulator::new(cfg),
            smoother:    Smoother::new(cfg),
            target:  home,
            current: home,
            cache:   TrackingCache::default(),
            mode:    GestureMode::Idle,
        }
    }

    /// Run one detection frame through the pipeline and move the camera.
    ///
    /// On `Err` the frame was discarded: target, current, cache, mode and
    /// camera are exactly as before the call.
    pub fn process<C: CameraSink + ?Sized>(
        &mut self,
        frame:  &HandFrame,
        camera: &mut C,
    ) -> Result<GestureMode, FrameError> {
        frame.validate()?;

        let mode = classify(frame);
        if self.cache.on_transition(self.mode, mode) {
            debug!(from = %self.mode, to = %mode, "gesture mode changed");
            self.mode = mode;
        }

        let motion = self.accumulator.accumulate(mode, frame, &mut self.target, &mut self.cache);
        if motion == Motion::Baseline {
            debug!(mode = %mode, "tracking baseline captured");
        }

        self.smoother.advance(&mut self.current, &self.target);
        OrbitCameraModel::apply(&self.current, camera);

        trace!(
            azimuth = self.current.azimuth,
            elevation = self.current.elevation,
            radius = self.current.radius,
            ?motion,
            "orbit updated"
        );
        Ok(mode)
    }

    /// Snap to home, forget all baselines and report `Idle`.
    /// The camera is not touched; see [`OrbitController::apply_camera`].
    pub fn reset(&mut self) -> GestureMode {
        self.mode = reset::reset(&mut self.target, &mut self.current, &mut self.cache, &self.cfg);
        info!("orbit reset to home");
        self.mode
    }

    /// Project the current orbit onto `camera` without advancing anything.
    pub fn apply_camera<C: CameraSink + ?Sized>(&self, camera: &mut C) {
        OrbitCameraModel::apply(&self.current, camera);
    }

    pub fn mode(&self)    -> GestureMode     { self.mode }
    pub fn target(&self)  -> &OrbitTarget    { &self.target }
    pub fn current(&self) -> &OrbitCurrent   { &self.current }
    pub fn cache(&self)   -> &TrackingCache  { &self.cache }
}

impl Default for OrbitController {
    fn default() -> Self {
        OrbitController::new(OrbitConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
