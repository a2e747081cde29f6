//! Frame loop.
//!
//! Pulls frames from a `LandmarkSource` one at a time and feeds them to the
//! shared session. The loop owns the source: it acquires it when the session
//! is `Starting`, releases it when the session goes `Idle`, and stops the
//! session when the source runs dry or fails. Events are emitted while the
//! session lock is held, so they reach the sink in the order the session
//! produced them.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::events::{EventSink, SessionEvent};
use crate::ingest::{LandmarkSource, SourceStats};
use crate::session::{SessionError, SessionState, SharedSession};

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct LoopOptions {
    /// Leave the loop as soon as the session is idle (non-interactive runs).
    pub exit_when_idle: bool,
    /// Sleep while idle and waiting for a start command.
    pub idle_poll: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            exit_when_idle: true,
            idle_poll: Duration::from_millis(50),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub events_emitted: u64,
    pub source: SourceStats,
}

/// Drive `session` from `source` until shutdown (or idle, per `options`).
pub fn run_frames(
    session: &SharedSession,
    source: &mut dyn LandmarkSource,
    sink: &mut dyn EventSink,
    shutdown: &AtomicBool,
    options: &LoopOptions,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let mut last_health_log = Instant::now();

    while !shutdown.load(Ordering::SeqCst) {
        let (state, facing) = session.with(|s| (s.state(), s.facing()))?;
        let emitted = match state {
            SessionState::Idle => {
                if source.is_connected() {
                    source.disconnect();
                }
                if options.exit_when_idle {
                    break;
                }
                std::thread::sleep(options.idle_poll);
                continue;
            }
            SessionState::Starting => {
                if source.is_connected() {
                    source.disconnect();
                }
                let acquired = source.connect(facing);
                let mut release = false;
                let emitted = session.update(sink, |s| match s.complete_start(acquired) {
                    Ok(event) => vec![event],
                    Err(SessionError::NotStarting(_)) => {
                        // Stopped while acquiring.
                        release = true;
                        vec![]
                    }
                    Err(err) => {
                        release = true;
                        vec![err.to_event()]
                    }
                })?;
                if release {
                    source.disconnect();
                }
                emitted
            }
            SessionState::Running => match source.next_frame() {
                Ok(Some(frame)) => {
                    summary.frames_processed += 1;
                    session.update(sink, |s| s.process_frame(&frame))?
                }
                Ok(None) => {
                    log::info!("{} source exhausted", source.name());
                    source.disconnect();
                    session.update(sink, |s| s.stop().into_iter().collect())?
                }
                Err(e) => {
                    log::warn!("{} source failed: {:#}", source.name(), e);
                    source.disconnect();
                    let reason = format!("{:#}", e);
                    session.update(sink, |s| {
                        let mut events: Vec<SessionEvent> = s.stop().into_iter().collect();
                        events.push(SessionError::CameraUnavailable(reason).to_event());
                        events
                    })?
                }
            },
        };
        summary.events_emitted += emitted as u64;

        if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
            let stats = source.stats();
            log::info!(
                "{} health={} frames={} hands={} malformed={}",
                stats.source,
                source.is_healthy(),
                stats.frames_delivered,
                stats.hands_seen,
                stats.malformed
            );
            last_health_log = Instant::now();
        }
    }

    if source.is_connected() {
        source.disconnect();
    }
    summary.source = source.stats();
    Ok(summary)
}
