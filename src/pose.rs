//! Synthetic hand poses.
//!
//! Builds upright, camera-facing hands with chosen fingers extended. Used by
//! the `stub://` landmark source and by tests. Joint spacing leaves at least
//! 0.08 normalized units between every tip and its reference joint, so small
//! jitter never flips an extension flag.

use rand::Rng;

use crate::classify::{FingerFlags, GestureLabel};
use crate::landmark::{index, Hand, Landmark, HAND_LANDMARKS};

/// Largest per-coordinate offset applied by [`jittered`].
pub const MAX_JITTER: f32 = 0.004;

const WRIST: Landmark = Landmark::new(0.50, 0.92, 0.0);

// Column x for index, middle, ring, pinky.
const FINGER_X: [f32; 4] = [0.42, 0.50, 0.58, 0.66];
const FINGER_BASES: [usize; 4] = [index::INDEX_MCP, index::MIDDLE_MCP, index::RING_MCP, index::PINKY_MCP];

const MCP_Y: f32 = 0.72;
const PIP_Y: f32 = 0.62;
const DIP_EXTENDED_Y: f32 = 0.54;
const DIP_CURLED_Y: f32 = 0.66;
const TIP_EXTENDED_Y: f32 = 0.46;
const TIP_CURLED_Y: f32 = 0.70;

const THUMB_CMC: Landmark = Landmark::new(0.42, 0.85, -0.01);
const THUMB_MCP: Landmark = Landmark::new(0.37, 0.78, -0.02);
const THUMB_IP: Landmark = Landmark::new(0.33, 0.70, -0.03);
const THUMB_TIP_EXTENDED: Landmark = Landmark::new(0.30, 0.58, -0.04);
const THUMB_TIP_CURLED: Landmark = Landmark::new(0.36, 0.78, -0.04);
const THUMB_TIP_DOWN: Landmark = Landmark::new(0.34, 0.90, -0.04);
const THUMB_TIP_PINCH: Landmark = Landmark::new(0.43, 0.72, -0.05);

/// Hand with exactly the fingers in `flags` extended, thumb away from index.
pub fn hand(flags: FingerFlags) -> Hand {
    let thumb_tip = if flags.thumb {
        THUMB_TIP_EXTENDED
    } else {
        THUMB_TIP_CURLED
    };
    build(
        thumb_tip,
        [flags.index, flags.middle, flags.ring, flags.pinky],
    )
}

/// Thumb tip touching a curled index tip, other three fingers extended.
pub fn ok_hand() -> Hand {
    build(THUMB_TIP_PINCH, [false, true, true, true])
}

/// Canonical hand for a vocabulary label.
///
/// `Love` yields the same hand as `Rock`. `ThumbsDown` yields a downward
/// thumb with a closed fist; neither has a distinct rule.
pub fn for_label(label: GestureLabel) -> Hand {
    let f = FingerFlags::new;
    match label {
        GestureLabel::ThumbsUp => hand(f(true, false, false, false, false)),
        GestureLabel::ThumbsDown => build(THUMB_TIP_DOWN, [false; 4]),
        GestureLabel::OpenPalm => hand(f(true, true, true, true, true)),
        GestureLabel::Peace => hand(f(false, true, true, false, false)),
        GestureLabel::Ok => ok_hand(),
        GestureLabel::PointUp => hand(f(false, true, false, false, false)),
        GestureLabel::Fist => hand(f(false, false, false, false, false)),
        GestureLabel::Rock | GestureLabel::Love => hand(f(true, true, false, false, true)),
        GestureLabel::Call => hand(f(true, false, false, false, true)),
    }
}

/// Copy of `hand` with every coordinate offset by up to [`MAX_JITTER`].
pub fn jittered<R: Rng>(hand: &Hand, rng: &mut R) -> Hand {
    let points: Vec<Landmark> = hand
        .points()
        .iter()
        .map(|p| {
            Landmark::new(
                p.x + rng.gen_range(-MAX_JITTER..=MAX_JITTER),
                p.y + rng.gen_range(-MAX_JITTER..=MAX_JITTER),
                p.z + rng.gen_range(-MAX_JITTER..=MAX_JITTER),
            )
        })
        .collect();
    Hand::from_points(&points).unwrap_or_else(|| hand.clone())
}

fn build(thumb_tip: Landmark, extended: [bool; 4]) -> Hand {
    let mut points = [Landmark::default(); HAND_LANDMARKS];
    points[index::WRIST] = WRIST;
    points[index::THUMB_CMC] = THUMB_CMC;
    points[index::THUMB_MCP] = THUMB_MCP;
    points[index::THUMB_IP] = THUMB_IP;
    points[index::THUMB_TIP] = thumb_tip;

    for ((&base, &x), &up) in FINGER_BASES.iter().zip(FINGER_X.iter()).zip(extended.iter()) {
        let (dip_y, tip_y) = if up {
            (DIP_EXTENDED_Y, TIP_EXTENDED_Y)
        } else {
            (DIP_CURLED_Y, TIP_CURLED_Y)
        };
        points[base] = Landmark::new(x, MCP_Y, 0.0);
        points[base + 1] = Landmark::new(x, PIP_Y, -0.01);
        points[base + 2] = Landmark::new(x, dip_y, -0.02);
        points[base + 3] = Landmark::new(x, tip_y, -0.03);
    }

    Hand { points }
}
