//! Hand landmark model.
//!
//! - `Landmark`: one normalized point (x, y in image space, z relative depth).
//! - `Hand`: exactly 21 landmarks in the MediaPipe index convention.
//! - `Frame`: one delivery from a landmark source (zero or one hand).
//!
//! `Hand` can only be built through `Hand::from_points`, which rejects input
//! that does not carry exactly 21 finite points. Downstream code therefore
//! never indexes outside the fixed point set.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a detected hand.
pub const HAND_LANDMARKS: usize = 21;

/// Named landmark indices (MediaPipe hand model).
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single normalized landmark.
///
/// `x`/`y` are in [0, 1] relative to the frame, with `y` growing downward.
/// `z` is relative depth; more negative is closer to the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane (x, y only).
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detected hand: exactly 21 landmarks.
///
/// Points are private; use [`Hand::point`] or the named accessors.
///
/// ```compile_fail
/// use handword::{Hand, Landmark};
/// let _hand = Hand { points: [Landmark::default(); 21] };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub(crate) points: [Landmark; HAND_LANDMARKS],
}

impl Hand {
    /// Build a hand from detector output.
    ///
    /// Returns `None` when the slice does not hold exactly 21 points or any
    /// coordinate is non-finite. Callers treat `None` as "no hand".
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; HAND_LANDMARKS] = points.try_into().ok()?;
        if !points.iter().all(Landmark::is_finite) {
            return None;
        }
        Some(Self { points })
    }

    /// Landmark at a fixed index. `i` must come from [`index`].
    pub fn point(&self, i: usize) -> Option<&Landmark> {
        self.points.get(i)
    }

    pub fn points(&self) -> &[Landmark; HAND_LANDMARKS] {
        &self.points
    }

    pub fn thumb_tip(&self) -> &Landmark {
        &self.points[index::THUMB_TIP]
    }

    pub fn index_tip(&self) -> &Landmark {
        &self.points[index::INDEX_TIP]
    }

    /// True when landmark `tip` sits strictly above landmark `joint` in image
    /// space (smaller y).
    pub(crate) fn is_above(&self, tip: usize, joint: usize) -> bool {
        match (self.point(tip), self.point(joint)) {
            (Some(t), Some(j)) => t.y < j.y,
            _ => false,
        }
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = anyhow::Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        let len = points.len();
        Hand::from_points(&points).ok_or_else(|| {
            anyhow::anyhow!(
                "hand requires {} finite landmarks, got {}",
                HAND_LANDMARKS,
                len
            )
        })
    }
}

/// One frame delivered by a landmark source.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Monotonic timestamp in milliseconds.
    pub t_ms: u64,
    /// First detected hand, if any.
    pub hand: Option<Hand>,
}

impl Frame {
    pub fn new(t_ms: u64, hand: Option<Hand>) -> Self {
        Self { t_ms, hand }
    }

    pub fn empty(t_ms: u64) -> Self {
        Self { t_ms, hand: None }
    }
}

/// Serialized frame record, one per line in a frames file.
///
/// Extra hands are ignored; only the first is considered. A first hand with
/// the wrong point count deserializes fine and becomes "no hand".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameRecord {
    pub t_ms: u64,
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

impl FrameRecord {
    pub fn into_frame(self) -> Frame {
        let hand = self
            .hands
            .first()
            .and_then(|points| Hand::from_points(points));
        Frame {
            t_ms: self.t_ms,
            hand,
        }
    }

    pub fn from_frame(frame: &Frame) -> Self {
        Self {
            t_ms: frame.t_ms,
            hands: frame
                .hand
                .iter()
                .map(|hand| hand.points().to_vec())
                .collect(),
        }
    }
}
