//! Session controller.
//!
//! `Session` is the single owner of hold state, the message and counters.
//! Frames and user commands both go through `&mut Session`; hosts that take
//! commands on another thread share it through [`SharedSession`].
//!
//! Lifecycle: `Idle -> Starting -> Running -> Idle`. A start request moves
//! the session to `Starting`; the frame-loop owner acquires the source and
//! reports back with [`Session::complete_start`]. Further start requests are
//! rejected until then.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::classify::{Classification, GestureClassifier, RuleClassifier, ThumbRule};
use crate::events::{EventSink, SessionEvent};
use crate::hold::{HoldTracker, HoldTransition, DEFAULT_HOLD_MS};
use crate::ingest::Facing;
use crate::landmark::Frame;
use crate::stats::{format_elapsed, DetectionRate, Message, DEFAULT_RATE_WINDOW_MS};

/// Display text when no gesture is current.
pub const NO_GESTURE: &str = "None";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub hold_ms: u64,
    pub rate_window_ms: u64,
    pub thumb_rule: ThumbRule,
    pub facing: Facing,
    /// Emit a `frame_classified` event for every frame.
    pub emit_frame_events: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hold_ms: DEFAULT_HOLD_MS,
            rate_window_ms: DEFAULT_RATE_WINDOW_MS,
            thumb_rule: ThumbRule::default(),
            facing: Facing::default(),
            emit_frame_events: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Starting,
    Running,
}

/// Session failures surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Start requested while a start is pending or the session is running.
    AlreadyActive(SessionState),
    /// Start completion reported while no start was pending.
    NotStarting(SessionState),
    /// Capture acquisition failed. Recoverable; the session is idle again.
    CameraUnavailable(String),
}

impl SessionError {
    /// Event a UI shows for this failure.
    pub fn to_event(&self) -> SessionEvent {
        SessionEvent::CameraError {
            reason: self.to_string(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyActive(state) => {
                write!(f, "session already active ({:?})", state)
            }
            SessionError::NotStarting(state) => {
                write!(f, "no start pending ({:?})", state)
            }
            SessionError::CameraUnavailable(reason) => {
                write!(f, "unable to access camera: {}", reason)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// User commands accepted by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Clear,
    Copy,
    Speak,
    SwitchCamera,
    /// Report current statistics.
    Stats,
}

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "clear" => Ok(Command::Clear),
            "copy" => Ok(Command::Copy),
            "speak" => Ok(Command::Speak),
            "switch" | "switch_camera" => Ok(Command::SwitchCamera),
            "stats" => Ok(Command::Stats),
            other => Err(anyhow!("unknown command '{}'", other)),
        }
    }
}

/// Point-in-time statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub state: SessionState,
    pub facing: Facing,
    pub current_gesture: String,
    pub confidence: u8,
    pub total_gestures: u64,
    pub words_formed: usize,
    pub detections_per_minute: usize,
    pub elapsed: String,
    pub message: String,
}

pub struct Session {
    config: SessionConfig,
    classifier: Box<dyn GestureClassifier>,
    hold: HoldTracker,
    rate: DetectionRate,
    message: Message,
    state: SessionState,
    facing: Facing,
    total_gestures: u64,
    last_confidence: u8,
    /// `None` until the first frame after a start.
    hand_visible: Option<bool>,
    last_t_ms: Option<u64>,
    started_at: Option<Instant>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let classifier = RuleClassifier::new(config.thumb_rule);
        Self::with_classifier(config, Box::new(classifier))
    }

    pub fn with_classifier(config: SessionConfig, classifier: Box<dyn GestureClassifier>) -> Self {
        Self {
            hold: HoldTracker::new(config.hold_ms),
            rate: DetectionRate::new(config.rate_window_ms),
            message: Message::new(),
            state: SessionState::Idle,
            facing: config.facing,
            total_gestures: 0,
            last_confidence: 0,
            hand_visible: None,
            last_t_ms: None,
            started_at: None,
            classifier,
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn hold(&self) -> &HoldTracker {
        &self.hold
    }

    pub fn total_gestures(&self) -> u64 {
        self.total_gestures
    }

    pub fn words_formed(&self) -> usize {
        self.message.len()
    }

    /// Time since the first successful start of this session.
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    /// Request capture. Rejected unless idle.
    pub fn request_start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyActive(self.state));
        }
        self.state = SessionState::Starting;
        Ok(())
    }

    /// Report the outcome of capture acquisition.
    pub fn complete_start(&mut self, acquired: Result<()>) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::Starting {
            return Err(SessionError::NotStarting(self.state));
        }
        match acquired {
            Ok(()) => {
                self.state = SessionState::Running;
                self.hand_visible = None;
                self.started_at.get_or_insert_with(Instant::now);
                log::info!("session running (facing {})", self.facing);
                Ok(SessionEvent::SessionStarted {
                    facing: self.facing,
                })
            }
            Err(e) => {
                self.state = SessionState::Idle;
                log::warn!("camera acquisition failed: {:#}", e);
                Err(SessionError::CameraUnavailable(format!("{:#}", e)))
            }
        }
    }

    /// Stop capture. Hold state and the session timer reset; the message
    /// and counters are kept.
    pub fn stop(&mut self) -> Option<SessionEvent> {
        if self.state == SessionState::Idle {
            return None;
        }
        let elapsed = format_elapsed(self.elapsed());
        self.state = SessionState::Idle;
        self.hold.reset();
        self.hand_visible = None;
        self.last_confidence = 0;
        self.started_at = None;
        log::info!("session stopped after {}", elapsed);
        Some(SessionEvent::SessionStopped { elapsed })
    }

    /// Toggle front/back camera. A running session goes back to `Starting`
    /// so the frame-loop owner re-acquires the source; the hold restarts on
    /// the new stream.
    pub fn switch_camera(&mut self) -> SessionEvent {
        self.facing = self.facing.toggled();
        if self.state == SessionState::Running {
            self.state = SessionState::Starting;
            self.hold.reset();
        }
        log::info!("camera facing switched to {}", self.facing);
        SessionEvent::CameraSwitched {
            facing: self.facing,
        }
    }

    /// Clear the message. Hold state and gesture count are untouched.
    pub fn clear_message(&mut self) -> SessionEvent {
        self.message.clear();
        SessionEvent::MessageCleared
    }

    /// Hand the message text to the clipboard collaborator.
    pub fn copy_message(&self) -> Option<SessionEvent> {
        self.message_text().map(|text| SessionEvent::MessageCopied { text })
    }

    /// Hand the message text to the speech collaborator.
    pub fn speak_message(&self) -> Option<SessionEvent> {
        self.message_text().map(|text| SessionEvent::MessageSpoken { text })
    }

    fn message_text(&self) -> Option<String> {
        let text = self.message.text();
        (!text.is_empty()).then_some(text)
    }

    /// Apply a user command.
    pub fn apply(&mut self, command: Command) -> Result<Vec<SessionEvent>, SessionError> {
        let events = match command {
            Command::Start => {
                self.request_start()?;
                vec![]
            }
            Command::Stop => self.stop().into_iter().collect(),
            Command::Clear => vec![self.clear_message()],
            Command::Copy => self.copy_message().into_iter().collect(),
            Command::Speak => self.speak_message().into_iter().collect(),
            Command::SwitchCamera => vec![self.switch_camera()],
            Command::Stats => vec![SessionEvent::StatsReported(self.stats())],
        };
        Ok(events)
    }

    /// Classify one frame and advance hold/message/stats.
    ///
    /// Frames are ignored unless the session is running.
    pub fn process_frame(&mut self, frame: &Frame) -> Vec<SessionEvent> {
        if self.state != SessionState::Running {
            return Vec::new();
        }
        if let Some(last) = self.last_t_ms.filter(|&last| frame.t_ms < last) {
            log::info!(
                "frame clock went back from {} to {} ms; restarting hold and rate windows",
                last,
                frame.t_ms
            );
            self.hold.reset();
            self.rate.clear();
        }
        self.last_t_ms = Some(frame.t_ms);

        let classification = self.classifier.classify(frame.hand.as_ref());
        self.last_confidence = classification.confidence;

        let mut events = Vec::new();
        if self.config.emit_frame_events {
            events.push(SessionEvent::FrameClassified {
                t_ms: frame.t_ms,
                label: classification.label,
                confidence: classification.confidence,
            });
        }

        let hand_visible = frame.hand.is_some();
        if !hand_visible && self.hand_visible != Some(false) {
            events.push(SessionEvent::NoHandDetected);
        }
        self.hand_visible = Some(hand_visible);

        if let Some(transition) = self.hold.observe(classification.label, frame.t_ms) {
            events.push(self.on_transition(transition, classification));
        }

        if classification.label.is_some() {
            let per_minute = self.rate.record(frame.t_ms);
            events.push(SessionEvent::DetectionRateUpdated { per_minute });
        }
        events
    }

    fn on_transition(
        &mut self,
        transition: HoldTransition,
        classification: Classification,
    ) -> SessionEvent {
        match transition {
            HoldTransition::Started(label) => {
                self.total_gestures += 1;
                log::debug!("gesture started: {} ({})", label, classification.confidence);
                SessionEvent::GestureStarted {
                    label,
                    word: label.word(),
                    confidence: classification.confidence,
                    total_gestures: self.total_gestures,
                }
            }
            HoldTransition::Released => SessionEvent::GestureReleased,
            HoldTransition::Committed { word, .. } => {
                self.message.push(word);
                log::info!("word committed: {} (message: {})", word, self.message.text());
                SessionEvent::WordCommitted {
                    word,
                    words_formed: self.message.len(),
                    message: self.message.text(),
                }
            }
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            state: self.state,
            facing: self.facing,
            current_gesture: self
                .hold
                .current()
                .map(|label| label.word().to_string())
                .unwrap_or_else(|| NO_GESTURE.to_string()),
            confidence: self.last_confidence,
            total_gestures: self.total_gestures,
            words_formed: self.message.len(),
            detections_per_minute: self
                .last_t_ms
                .map(|now| self.rate.count_at(now))
                .unwrap_or(0),
            elapsed: format_elapsed(self.elapsed()),
            message: self.message.text(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

/// Mutex-guarded session shared between the frame loop and command input.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("session lock poisoned"))
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Run `f` and emit the events it returns. Events reach `sink` before
    /// the lock is released. Returns the number of events emitted.
    pub fn update(
        &self,
        sink: &mut dyn EventSink,
        f: impl FnOnce(&mut Session) -> Vec<SessionEvent>,
    ) -> Result<usize> {
        let mut guard = self.lock()?;
        let events = f(&mut guard);
        sink.emit_all(&events)?;
        Ok(events.len())
    }
}
