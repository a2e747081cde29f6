//! Local file landmark source.
//!
//! Replays recorded detector output, one JSON object per line:
//!
//! ```text
//! {"t_ms": 0, "hands": [[{"x": 0.5, "y": 0.9, "z": 0.0}, ...]]}
//! ```
//!
//! The file source is responsible for:
//! - Reading local files only (no URL schemes)
//! - Keeping only the first hand of each record
//! - Turning unreadable records and short hands into counted drops
//!
//! Facing mode has no meaning for a recording and is ignored.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;

use super::{Facing, LandmarkSource, SourceStats};
use crate::landmark::{Frame, FrameRecord};

/// Longest sleep inserted between two recorded frames in realtime mode.
const MAX_REPLAY_GAP: Duration = Duration::from_secs(1);

/// Configuration for a local file source.
#[derive(Clone, Debug, Default)]
pub struct FileConfig {
    /// Local file path (e.g., "recordings/session.jsonl").
    pub path: String,
    /// Sleep between frames according to their recorded timestamps.
    pub realtime: bool,
}

/// JSON-lines file source.
pub struct FileSource {
    config: FileConfig,
    reader: Option<BufReader<File>>,
    last_t_ms: Option<u64>,
    line_no: u64,
    stats: SourceStats,
}

impl FileSource {
    pub fn new(config: FileConfig) -> Result<Self> {
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "file ingestion only supports local paths (no URL schemes)"
            ));
        }
        let stats = SourceStats {
            source: config.path.clone(),
            ..SourceStats::default()
        };
        Ok(Self {
            config,
            reader: None,
            last_t_ms: None,
            line_no: 0,
            stats,
        })
    }

    fn pace(&mut self, t_ms: u64) {
        if let Some(prev) = self.last_t_ms {
            let gap = Duration::from_millis(t_ms.saturating_sub(prev)).min(MAX_REPLAY_GAP);
            if !gap.is_zero() {
                std::thread::sleep(gap);
            }
        }
    }
}

impl LandmarkSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn connect(&mut self, facing: Facing) -> Result<()> {
        if self.reader.is_some() {
            log::info!(
                "FileSource: already open at line {}, facing {} ignored",
                self.line_no,
                facing
            );
            return Ok(());
        }
        let file = File::open(&self.config.path)
            .with_context(|| format!("failed to open frames file {}", self.config.path))?;
        self.reader = Some(BufReader::new(file));
        self.last_t_ms = None;
        self.line_no = 0;
        log::info!("FileSource: connected to {}", self.config.path);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            let Some(reader) = self.reader.as_mut() else {
                return Err(anyhow!("file source {} is not connected", self.config.path));
            };
            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .with_context(|| format!("failed to read {}", self.config.path))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: FrameRecord = match serde_json::from_str(trimmed) {
                Ok(record) => record,
                Err(e) => {
                    self.stats.malformed += 1;
                    log::warn!(
                        "FileSource: skipping line {} of {}: {}",
                        self.line_no,
                        self.config.path,
                        e
                    );
                    continue;
                }
            };
            let had_hand = !record.hands.is_empty();
            let frame = record.into_frame();
            if had_hand && frame.hand.is_none() {
                self.stats.malformed += 1;
                log::debug!(
                    "FileSource: line {} hand without 21 finite points treated as no hand",
                    self.line_no
                );
            }

            if self.config.realtime {
                self.pace(frame.t_ms);
            }
            self.last_t_ms = Some(frame.t_ms);
            self.stats.frames_delivered += 1;
            if frame.hand.is_some() {
                self.stats.hands_seen += 1;
            }
            return Ok(Some(frame));
        }
    }

    fn disconnect(&mut self) {
        if self.reader.take().is_some() {
            log::info!("FileSource: released {}", self.config.path);
        }
    }

    fn is_connected(&self) -> bool {
        self.reader.is_some()
    }

    fn is_healthy(&self) -> bool {
        self.reader.is_some()
    }

    fn stats(&self) -> SourceStats {
        self.stats.clone()
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    !path.contains("://")
}
