//! Rule-based static pose classifier.
//!
//! Each finger is "extended" when its tip sits strictly above a reference
//! joint on the same finger (image y grows downward). This assumes an upright
//! hand facing the camera; tilted or inverted hands misclassify.
//!
//! Rules are evaluated in a fixed order and the first match wins.

use serde::{Deserialize, Serialize};

use crate::landmark::{index, Hand};

use super::backend::GestureClassifier;
use super::result::{Classification, GestureLabel};

/// Maximum planar thumb-tip/index-tip distance for the "ok" pinch.
pub const OK_PINCH_THRESHOLD: f32 = 0.07;

/// Which joints the thumb tip is compared against.
///
/// Two variants of the thumb test exist in the field; they are kept separate
/// and selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbRule {
    /// Tip above the IP joint (3).
    #[default]
    Ip,
    /// Tip above both the IP joint (3) and the MCP joint (2).
    IpAndMcp,
}

impl std::str::FromStr for ThumbRule {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ip" => Ok(ThumbRule::Ip),
            "ip_and_mcp" | "ip+mcp" => Ok(ThumbRule::IpAndMcp),
            other => Err(anyhow::anyhow!(
                "unknown thumb rule '{}' (expected ip or ip_and_mcp)",
                other
            )),
        }
    }
}

/// Per-finger extension flags for one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FingerFlags {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerFlags {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    pub fn from_hand(hand: &Hand, thumb_rule: ThumbRule) -> Self {
        let thumb = match thumb_rule {
            ThumbRule::Ip => hand.is_above(index::THUMB_TIP, index::THUMB_IP),
            ThumbRule::IpAndMcp => {
                hand.is_above(index::THUMB_TIP, index::THUMB_IP)
                    && hand.is_above(index::THUMB_TIP, index::THUMB_MCP)
            }
        };
        Self {
            thumb,
            index: hand.is_above(index::INDEX_TIP, index::INDEX_PIP),
            middle: hand.is_above(index::MIDDLE_TIP, index::MIDDLE_PIP),
            ring: hand.is_above(index::RING_TIP, index::RING_PIP),
            pinky: hand.is_above(index::PINKY_TIP, index::PINKY_PIP),
        }
    }

    /// Exact match against a full flag combination.
    fn is(&self, thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> bool {
        *self == FingerFlags::new(thumb, index, middle, ring, pinky)
    }
}

struct Rule {
    label: GestureLabel,
    confidence: u8,
    matches: fn(&FingerFlags, &Hand) -> bool,
}

fn thumbs_up(f: &FingerFlags, _: &Hand) -> bool {
    f.is(true, false, false, false, false)
}

fn fist(f: &FingerFlags, _: &Hand) -> bool {
    f.is(false, false, false, false, false)
}

fn peace(f: &FingerFlags, _: &Hand) -> bool {
    f.is(false, true, true, false, false)
}

fn open_palm(f: &FingerFlags, _: &Hand) -> bool {
    f.is(true, true, true, true, true)
}

fn ok(f: &FingerFlags, hand: &Hand) -> bool {
    hand.thumb_tip().planar_distance(hand.index_tip()) < OK_PINCH_THRESHOLD
        && f.middle
        && f.ring
        && f.pinky
}

fn point_up(f: &FingerFlags, _: &Hand) -> bool {
    f.is(false, true, false, false, false)
}

fn horns(f: &FingerFlags, _: &Hand) -> bool {
    f.is(true, true, false, false, true)
}

fn call(f: &FingerFlags, _: &Hand) -> bool {
    f.is(true, false, false, false, true)
}

static RULES: &[Rule] = &[
    Rule {
        label: GestureLabel::ThumbsUp,
        confidence: 95,
        matches: thumbs_up,
    },
    Rule {
        label: GestureLabel::Fist,
        confidence: 98,
        matches: fist,
    },
    Rule {
        label: GestureLabel::Peace,
        confidence: 97,
        matches: peace,
    },
    Rule {
        label: GestureLabel::OpenPalm,
        confidence: 99,
        matches: open_palm,
    },
    Rule {
        label: GestureLabel::Ok,
        confidence: 92,
        matches: ok,
    },
    Rule {
        label: GestureLabel::PointUp,
        confidence: 94,
        matches: point_up,
    },
    Rule {
        label: GestureLabel::Rock,
        confidence: 91,
        matches: horns,
    },
    Rule {
        label: GestureLabel::Call,
        confidence: 93,
        matches: call,
    },
    // Same predicate as Rock above, so first-match never reaches it. Kept in
    // place until the intended "love" pose is defined.
    Rule {
        label: GestureLabel::Love,
        confidence: 96,
        matches: horns,
    },
];

/// Ordered first-match rule classifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleClassifier {
    thumb_rule: ThumbRule,
}

impl RuleClassifier {
    pub fn new(thumb_rule: ThumbRule) -> Self {
        Self { thumb_rule }
    }

    /// Extension flags this classifier derives for a hand.
    pub fn finger_flags(&self, hand: &Hand) -> FingerFlags {
        FingerFlags::from_hand(hand, self.thumb_rule)
    }
}

impl GestureClassifier for RuleClassifier {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn classify(&self, hand: Option<&Hand>) -> Classification {
        let Some(hand) = hand else {
            return Classification::NONE;
        };
        let flags = self.finger_flags(hand);
        RULES
            .iter()
            .find(|rule| (rule.matches)(&flags, hand))
            .map(|rule| Classification::new(rule.label, rule.confidence))
            .unwrap_or(Classification::NONE)
    }
}
