//! Handword: hand-gesture to word translation.
//!
//! A landmark source delivers frames of 21 hand landmarks. Each frame is
//! classified by a fixed, ordered rule set into a gesture label. A label held
//! for longer than the hold threshold commits its word to the running message.
//!
//! # Module Structure
//!
//! - `landmark`: Landmark, Hand and Frame types, plus the JSON-lines record form
//! - `classify`: Finger-extension flags and the ordered gesture rules
//! - `hold`: Hold-to-commit tracker
//! - `stats`: Detection rate window, message buffer, elapsed-time formatting
//! - `session`: Session lifecycle, commands and per-frame processing
//! - `events`: Session events and sinks
//! - `ingest`: Landmark sources (recorded files, synthetic scripts)
//! - `driver`: Frame loop tying a source to a shared session
//! - `config`: Daemon configuration (file + environment)
//! - `pose`: Synthetic hand poses for tests and the synthetic source

pub mod classify;
pub mod config;
pub mod driver;
pub mod events;
pub mod hold;
pub mod ingest;
pub mod landmark;
pub mod pose;
pub mod session;
pub mod stats;

pub use classify::{
    classify, Classification, FingerFlags, GestureClassifier, GestureLabel, RuleClassifier,
    ThumbRule, Word, OK_PINCH_THRESHOLD,
};
pub use config::HandwordConfig;
pub use driver::{run_frames, LoopOptions, RunSummary};
pub use events::{EventSink, JsonLinesSink, MemorySink, SessionEvent};
pub use hold::{HoldTracker, HoldTransition, DEFAULT_HOLD_MS};
pub use ingest::{
    open_source, Facing, FileConfig, FileSource, LandmarkSource, SourceSettings, SourceStats,
    SyntheticConfig, SyntheticSource,
};
pub use landmark::{Frame, FrameRecord, Hand, Landmark, HAND_LANDMARKS};
pub use session::{
    Command, Session, SessionConfig, SessionError, SessionState, SessionStats, SharedSession,
};
pub use stats::{format_elapsed, DetectionRate, Message, DEFAULT_RATE_WINDOW_MS};
