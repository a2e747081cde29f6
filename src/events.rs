//! Session output events and sinks.
//!
//! Events are the only thing a UI layer sees. They serialize as tagged JSON
//! objects (`{"event": "word_committed", ...}`), one per line.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::classify::{GestureLabel, Word};
use crate::ingest::Facing;
use crate::session::SessionStats;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        facing: Facing,
    },
    SessionStopped {
        elapsed: String,
    },
    /// Capture could not be acquired. The session is idle again.
    CameraError {
        reason: String,
    },
    CameraSwitched {
        facing: Facing,
    },
    /// Per-frame classification (opt-in).
    FrameClassified {
        t_ms: u64,
        label: Option<GestureLabel>,
        confidence: u8,
    },
    GestureStarted {
        label: GestureLabel,
        word: Word,
        confidence: u8,
        total_gestures: u64,
    },
    GestureReleased,
    WordCommitted {
        word: Word,
        words_formed: usize,
        message: String,
    },
    DetectionRateUpdated {
        per_minute: usize,
    },
    NoHandDetected,
    MessageCleared,
    MessageCopied {
        text: String,
    },
    MessageSpoken {
        text: String,
    },
    StatsReported(SessionStats),
}

/// Consumer of session events.
pub trait EventSink {
    fn emit(&mut self, event: &SessionEvent) -> Result<()>;

    fn emit_all(&mut self, events: &[SessionEvent]) -> Result<()> {
        for event in events {
            self.emit(event)?;
        }
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &SessionEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SessionEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed_words(&self) -> Vec<Word> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::WordCommitted { word, .. } => Some(*word),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: &SessionEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn events_serialize_as_tagged_objects() -> Result<()> {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&SessionEvent::WordCommitted {
            word: Word::Hello,
            words_formed: 1,
            message: "HELLO".to_string(),
        })?;
        sink.emit(&SessionEvent::NoHandDetected)?;
        sink.emit(&SessionEvent::FrameClassified {
            t_ms: 5,
            label: None,
            confidence: 0,
        })?;

        let out = String::from_utf8(sink.into_inner())?;
        let lines: Vec<Value> = out
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(
            lines[0],
            json!({"event": "word_committed", "word": "HELLO", "words_formed": 1, "message": "HELLO"})
        );
        assert_eq!(lines[1], json!({"event": "no_hand_detected"}));
        assert_eq!(
            lines[2],
            json!({"event": "frame_classified", "t_ms": 5, "label": null, "confidence": 0})
        );
        Ok(())
    }

    #[test]
    fn memory_sink_collects_committed_words() -> Result<()> {
        let mut sink = MemorySink::new();
        sink.emit_all(&[
            SessionEvent::GestureReleased,
            SessionEvent::WordCommitted {
                word: Word::Yes,
                words_formed: 1,
                message: "YES".to_string(),
            },
        ])?;
        assert_eq!(sink.committed_words(), vec![Word::Yes]);
        Ok(())
    }
}
