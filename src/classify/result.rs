use serde::{Deserialize, Serialize};
use std::fmt;

/// Static hand poses in the recognized vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureLabel {
    ThumbsUp,
    ThumbsDown,
    OpenPalm,
    Peace,
    Ok,
    PointUp,
    Fist,
    Rock,
    Call,
    Love,
}

impl GestureLabel {
    pub const ALL: [GestureLabel; 10] = [
        GestureLabel::ThumbsUp,
        GestureLabel::ThumbsDown,
        GestureLabel::OpenPalm,
        GestureLabel::Peace,
        GestureLabel::Ok,
        GestureLabel::PointUp,
        GestureLabel::Fist,
        GestureLabel::Rock,
        GestureLabel::Call,
        GestureLabel::Love,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbs_up",
            Self::ThumbsDown => "thumbs_down",
            Self::OpenPalm => "open_palm",
            Self::Peace => "peace",
            Self::Ok => "ok",
            Self::PointUp => "point_up",
            Self::Fist => "fist",
            Self::Rock => "rock",
            Self::Call => "call",
            Self::Love => "love",
        }
    }

    /// Display word committed to the message for this pose.
    pub fn word(&self) -> Word {
        match self {
            Self::ThumbsUp => Word::Yes,
            Self::ThumbsDown => Word::No,
            Self::OpenPalm => Word::Hello,
            Self::Peace => Word::Peace,
            Self::Ok => Word::Okay,
            Self::PointUp => Word::Wait,
            Self::Fist => Word::Stop,
            Self::Rock => Word::Rock,
            Self::Call => Word::Call,
            Self::Love => Word::Love,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GestureLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        GestureLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("unknown gesture label '{}'", s))
    }
}

/// Word appended to the message when a gesture is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Word {
    Yes,
    No,
    Hello,
    Peace,
    Okay,
    Wait,
    Stop,
    Rock,
    Call,
    Love,
}

impl Word {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Hello => "HELLO",
            Self::Peace => "PEACE",
            Self::Okay => "OKAY",
            Self::Wait => "WAIT",
            Self::Stop => "STOP",
            Self::Rock => "ROCK",
            Self::Call => "CALL",
            Self::Love => "LOVE",
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame classifier output. Not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// `None` when no hand was seen or no rule matched.
    pub label: Option<GestureLabel>,
    /// Fixed heuristic score in [0, 100].
    pub confidence: u8,
}

impl Classification {
    pub const NONE: Classification = Classification {
        label: None,
        confidence: 0,
    };

    pub const fn new(label: GestureLabel, confidence: u8) -> Self {
        Self {
            label: Some(label),
            confidence,
        }
    }

    pub fn is_none(&self) -> bool {
        self.label.is_none()
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::NONE
    }
}
