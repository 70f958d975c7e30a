//! # hand_frame
//!
//! The per-frame output of a hand-landmark detector, as consumed by the
//! orbit controller:
//!
//! * a [`HandFrame`] holds 0, 1 or 2 [`Hand`]s,
//! * a [`Hand`] is exactly 21 [`Landmark`]s in the usual skeleton order
//!   (wrist first, then thumb → pinky, base joint to tip),
//! * a [`Landmark`] has frame-relative `x`, `y` in `[0, 1]` (image axes,
//!   so `y` grows downward) and a depth `z` relative to the wrist.
//!
//! Landmark [`ANCHOR`] (the middle-finger base joint) is the single point
//! the controller tracks; it wobbles far less than the fingertips.
//!
//! ```rust
//! use hand_frame::{HandFrame, LANDMARK_COUNT};
//!
//! let flat = vec![0.5_f32; LANDMARK_COUNT * 3];
//! let frame = HandFrame::from_flat(&flat, 1).unwrap();
//! assert_eq!(frame.len(), 1);
//! assert!(frame.validate().is_ok());
//! assert_eq!(frame.hands()[0].anchor().x, 0.5);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Points per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// The tracked stability point: base joint of the middle finger.
pub const ANCHOR: usize = MIDDLE_MCP;

/// Largest hand count the controller interprets.
pub const MAX_HANDS: usize = 2;

/// Finger chains (base joint → tip) hanging off the wrist.
pub const FINGERS: [[usize; 4]; 5] = [
    [THUMB_CMC,  THUMB_MCP,  THUMB_IP,   THUMB_TIP ],
    [INDEX_MCP,  INDEX_PIP,  INDEX_DIP,  INDEX_TIP ],
    [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
    [RING_MCP,   RING_PIP,   RING_DIP,   RING_TIP  ],
    [PINKY_MCP,  PINKY_PIP,  PINKY_DIP,  PINKY_TIP ],
];

/// Bones of the hand skeleton: each finger chain, the wrist to the thumb,
/// index and pinky bases, and the knuckle line across the palm.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST,      THUMB_CMC),  (THUMB_CMC,  THUMB_MCP),  (THUMB_MCP,  THUMB_IP),   (THUMB_IP,   THUMB_TIP),
    (WRIST,      INDEX_MCP),  (INDEX_MCP,  INDEX_PIP),  (INDEX_PIP,  INDEX_DIP),  (INDEX_DIP,  INDEX_TIP),
    (INDEX_MCP,  MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),   (RING_MCP,   RING_PIP),   (RING_PIP,   RING_DIP),   (RING_DIP,   RING_TIP),
    (RING_MCP,   PINKY_MCP),  (WRIST,      PINKY_MCP),
    (PINKY_MCP,  PINKY_PIP),  (PINKY_PIP,  PINKY_DIP),  (PINKY_DIP,  PINKY_TIP),
];

// ════════════════════════════════════════════════════════════════════════════
// FrameError
// ════════════════════════════════════════════════════════════════════════════

/// Why a detection result cannot be interpreted.
///
/// Every variant is recoverable: the frame is dropped and tracking goes on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("hand has {0} landmarks, expected {LANDMARK_COUNT}")]
    LandmarkCount(usize),

    #[error("landmark buffer holds {got} values, {needed} needed for {hands} hand(s)")]
    Truncated { got: usize, needed: usize, hands: usize },

    #[error("non-finite coordinate at hand {hand}, landmark {landmark}")]
    NonFinite { hand: usize, landmark: usize },

    #[error("{0} hands detected, at most {MAX_HANDS} are interpreted")]
    TooManyHands(usize),
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One skeletal point in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist; smaller is closer to the camera.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Planar position widened to `f64`.
    pub fn xy(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

/// Euclidean distance between two landmarks in the image plane.
/// Depth is ignored.
pub fn planar_distance(a: &Landmark, b: &Landmark) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

// ════════════════════════════════════════════════════════════════════════════
// Hand
// ════════════════════════════════════════════════════════════════════════════

/// A single detected hand: exactly [`LANDMARK_COUNT`] points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct Hand {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Hand { landmarks }
    }

    /// Build a hand from a detector slice; the length must be exactly 21.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, FrameError> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| FrameError::LandmarkCount(points.len()))?;
        Ok(Hand { landmarks })
    }

    /// The tracked point, landmark [`ANCHOR`].
    pub fn anchor(&self) -> Landmark {
        self.landmarks[ANCHOR]
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Index of the first landmark carrying NaN or infinity.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.landmarks.iter().position(|p| !p.is_finite())
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = FrameError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Hand::from_slice(&points)
    }
}

impl From<Hand> for Vec<Landmark> {
    fn from(hand: Hand) -> Self {
        hand.landmarks.to_vec()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the detector found in one video frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl HandFrame {
    /// A frame with no hands in view.
    pub fn empty() -> Self {
        HandFrame::default()
    }

    pub fn new(hands: Vec<Hand>) -> Self {
        HandFrame { hands }
    }

    /// Parse the detector's packed layout:
    /// `data[hand * 63 + landmark * 3 + axis]`, axis order x, y, z.
    pub fn from_flat(data: &[f32], num_hands: usize) -> Result<Self, FrameError> {
        let stride = LANDMARK_COUNT * 3;
        let needed = num_hands * stride;
        if data.len() < needed {
            return Err(FrameError::Truncated { got: data.len(), needed, hands: num_hands });
        }

        let hands = data[..needed]
            .chunks_exact(stride)
            .map(|chunk| {
                let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
                for (slot, xyz) in landmarks.iter_mut().zip(chunk.chunks_exact(3)) {
                    *slot = Landmark::new(xyz[0], xyz[1], xyz[2]);
                }
                Hand::new(landmarks)
            })
            .collect();

        Ok(HandFrame { hands })
    }

    pub fn hands(&self) -> &[Hand] { &self.hands }
    pub fn len(&self)      -> usize  { self.hands.len() }
    pub fn is_empty(&self) -> bool   { self.hands.is_empty() }

    /// Check that the frame can be interpreted: at most [`MAX_HANDS`]
    /// hands and no NaN/infinite coordinates anywhere.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.hands.len() > MAX_HANDS {
            return Err(FrameError::TooManyHands(self.hands.len()));
        }
        for (hand, h) in self.hands.iter().enumerate() {
            if let Some(landmark) = h.first_non_finite() {
                return Err(FrameError::NonFinite { hand, landmark });
            }
        }
        Ok(())
    }

    /// Distance between the anchors of the first two hands.
    pub fn anchor_spread(&self) -> Option<f64> {
        match self.hands.as_slice() {
            [a, b, ..] => Some(planar_distance(&a.anchor(), &b.anchor())),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(x: f32, y: f32) -> Vec<f32> {
        (0..LANDMARK_COUNT).flat_map(|_| [x, y, 0.0]).collect()
    }

    #[test]
    fn skeleton_reaches_every_landmark() {
        let mut touched = [false; LANDMARK_COUNT];
        for &(a, b) in &HAND_CONNECTIONS {
            assert_ne!(a, b);
            touched[a] = true;
            touched[b] = true;
        }
        assert!(touched.iter().all(|&t| t));

        let hand = Hand::new([Landmark::default(); LANDMARK_COUNT]);
        assert!(HAND_CONNECTIONS.iter().all(|&(a, b)| hand.landmark(a).is_some() && hand.landmark(b).is_some()));
        assert!(hand.landmark(LANDMARK_COUNT).is_none());
    }

    #[test]
    fn anchor_is_middle_finger_base() {
        assert_eq!(ANCHOR, 9);
        assert_eq!(FINGERS[2][0], ANCHOR);
    }

    #[test]
    fn from_flat_reads_hand_major_layout() {
        let mut data = flat_hand(0.1, 0.2);
        data.extend(flat_hand(0.7, 0.8));
        data[ANCHOR * 3] = 0.33;

        let frame = HandFrame::from_flat(&data, 2).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.hands()[0].anchor().x, 0.33);
        assert_eq!(frame.hands()[1].anchor().y, 0.8);
    }

    #[test]
    fn from_flat_zero_hands_is_empty() {
        let frame = HandFrame::from_flat(&[], 0).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn from_flat_short_buffer_is_truncated() {
        let data = flat_hand(0.5, 0.5);
        let err = HandFrame::from_flat(&data, 2).unwrap_err();
        assert_eq!(err, FrameError::Truncated { got: 63, needed: 126, hands: 2 });
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(Hand::from_slice(&pts), Err(FrameError::LandmarkCount(20)));
    }

    #[test]
    fn validate_flags_nan_with_position() {
        let mut data = flat_hand(0.5, 0.5);
        data.extend(flat_hand(0.5, 0.5));
        data[LANDMARK_COUNT * 3 + 4 * 3 + 1] = f32::NAN;

        let frame = HandFrame::from_flat(&data, 2).unwrap();
        assert_eq!(frame.validate(), Err(FrameError::NonFinite { hand: 1, landmark: 4 }));
    }

    #[test]
    fn validate_flags_infinite_depth() {
        let mut data = flat_hand(0.5, 0.5);
        data[2] = f32::INFINITY;
        let frame = HandFrame::from_flat(&data, 1).unwrap();
        assert!(matches!(frame.validate(), Err(FrameError::NonFinite { hand: 0, landmark: 0 })));
    }

    #[test]
    fn validate_rejects_three_hands() {
        let data: Vec<f32> = (0..3).flat_map(|_| flat_hand(0.5, 0.5)).collect();
        let frame = HandFrame::from_flat(&data, 3).unwrap();
        assert_eq!(frame.validate(), Err(FrameError::TooManyHands(3)));
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert!((planar_distance(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn anchor_spread_needs_two_hands() {
        let one = HandFrame::from_flat(&flat_hand(0.5, 0.5), 1).unwrap();
        assert_eq!(one.anchor_spread(), None);

        let mut data = flat_hand(0.2, 0.5);
        data.extend(flat_hand(0.5, 0.5));
        let two = HandFrame::from_flat(&data, 2).unwrap();
        assert!((two.anchor_spread().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn hand_deserializes_from_landmark_list() {
        let json = format!(
            "{{\"hands\":[[{}]]}}",
            vec!["{\"x\":0.25,\"y\":0.75}"; LANDMARK_COUNT].join(",")
        );
        let frame: HandFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.hands()[0].anchor(), Landmark::new(0.25, 0.75, 0.0));
    }

    #[test]
    fn hand_with_short_landmark_list_fails_to_deserialize() {
        let json = "{\"hands\":[[{\"x\":0.1,\"y\":0.1}]]}";
        let err = serde_json::from_str::<HandFrame>(json).unwrap_err();
        assert!(err.to_string().contains("expected 21"));
    }
}
