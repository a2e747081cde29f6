//! Landmark frame sources.
//!
//! A source stands in for camera acquisition plus the external hand-landmark
//! detector. It delivers frames in arrival order, each with zero or one hand:
//! - `FileSource`: JSON-lines recordings of detector output
//! - `SyntheticSource`: scripted poses (`stub://` URIs) for demos and tests
//!
//! Sources MUST NOT:
//! - Reorder or buffer frames beyond the most recent one
//! - Deliver more than one hand per frame
//! - Fail on malformed landmark sets (those become "no hand")

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::landmark::Frame;

pub mod file;
pub mod synthetic;

pub use file::{FileConfig, FileSource};
pub use synthetic::{ScriptSegment, SyntheticConfig, SyntheticSource};

/// Camera facing mode requested at acquisition time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Front camera.
    #[default]
    User,
    /// Back camera.
    Environment,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::User => "user",
            Facing::Environment => "environment",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Facing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "front" => Ok(Facing::User),
            "environment" | "back" => Ok(Facing::Environment),
            other => Err(anyhow!(
                "unknown facing mode '{}' (expected user or environment)",
                other
            )),
        }
    }
}

/// Frame source trait.
pub trait LandmarkSource: Send {
    /// Source identifier (for logs).
    fn name(&self) -> &str;

    /// Acquire the capture resource. Failure is recoverable; the caller may
    /// try again later.
    fn connect(&mut self, facing: Facing) -> Result<()>;

    /// Next frame in arrival order, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Release the capture resource immediately.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    fn is_healthy(&self) -> bool;

    fn stats(&self) -> SourceStats;
}

/// Counters reported by every source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub source: String,
    pub frames_delivered: u64,
    pub hands_seen: u64,
    /// Records that were skipped or hands that did not carry 21 points.
    pub malformed: u64,
}

/// Settings shared by all sources.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceSettings {
    /// `stub://...` for synthetic scripts, otherwise a local file path.
    pub uri: String,
    /// Frame rate for synthetic sources.
    pub target_fps: u32,
    /// Sleep between frames to reproduce capture timing.
    pub realtime: bool,
    /// Seed for synthetic landmark jitter.
    pub seed: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            uri: synthetic::DEMO_URI.to_string(),
            target_fps: 30,
            realtime: false,
            seed: 0,
        }
    }
}

/// Build the source named by `settings.uri`.
pub fn open_source(settings: &SourceSettings) -> Result<Box<dyn LandmarkSource>> {
    if settings.uri.starts_with(synthetic::SCHEME) {
        let config = SyntheticConfig::from_settings(settings)?;
        return Ok(Box::new(SyntheticSource::new(config)));
    }
    let config = FileConfig {
        path: settings.uri.clone(),
        realtime: settings.realtime,
    };
    Ok(Box::new(FileSource::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_toggles_and_parses() {
        assert_eq!(Facing::User.toggled(), Facing::Environment);
        assert_eq!(Facing::Environment.toggled(), Facing::User);
        assert_eq!("back".parse::<Facing>().unwrap(), Facing::Environment);
        assert_eq!("USER".parse::<Facing>().unwrap(), Facing::User);
        assert!("side".parse::<Facing>().is_err());
    }

    #[test]
    fn open_source_dispatches_on_scheme() -> Result<()> {
        let stub = open_source(&SourceSettings::default())?;
        assert_eq!(stub.name(), "synthetic");

        let file = open_source(&SourceSettings {
            uri: "/tmp/frames.jsonl".to_string(),
            ..SourceSettings::default()
        })?;
        assert_eq!(file.name(), "file");

        let remote = open_source(&SourceSettings {
            uri: "https://example.com/frames.jsonl".to_string(),
            ..SourceSettings::default()
        });
        assert!(remote.is_err());
        Ok(())
    }
}
