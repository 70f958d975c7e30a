//! # hand_orbit
//!
//! Touchless orbit viewer: a wireframe preview whose camera is steered by
//! hand gestures through [`orbit_control`].
//!
//! ## Gesture → camera
//!
//! | Hands | Mode | Effect |
//! |---|---|---|
//! | 0 | IDLE | camera glides to rest |
//! | 1 | ROTATE | hand motion orbits around the model |
//! | 2 | ZOOM | spreading the hands apart pulls the camera in |
//!
//! ## Sources
//!
//! * (default) **Simulation**: the mouse stands in for the hands.  Hold the
//!   left button for one hand under the cursor; hold the right button for
//!   two hands whose spread follows the cursor's horizontal distance from
//!   the centre.
//! * `--replay <file>`: play back recorded detections (JSON lines).
//!
//! ### Keys
//!
//! | Key | Action |
//! |---|---|
//! | `R` | Reset view |
//! | `Q` / `Escape` | Quit |

pub mod source;
pub mod perspective;
pub mod scene;
pub mod visualizer;
pub mod app;
