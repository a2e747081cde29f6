//! Synthetic landmark source (`stub://` URIs).
//!
//! Plays a script of poses at a fixed frame rate with small seeded jitter.
//!
//! - `stub://demo` plays the built-in demo script.
//! - `stub://peace:1200,none:200,fist` plays the listed segments; the
//!   duration defaults to 1000 ms and `none` produces frames without a hand.

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use super::{Facing, LandmarkSource, SourceSettings, SourceStats};
use crate::classify::GestureLabel;
use crate::landmark::Frame;
use crate::pose;

pub const SCHEME: &str = "stub://";
pub const DEMO_URI: &str = "stub://demo";

const DEFAULT_SEGMENT_MS: u64 = 1_000;
const DEMO_SCRIPT: &str = "open_palm:1000,none:200,thumbs_up:1000,none:200,peace:1000,none:200,\
ok:1000,none:200,point_up:1000,none:200,rock:1000,none:200,call:1000,none:200,fist:1000";

/// One scripted pose held for a duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptSegment {
    pub label: Option<GestureLabel>,
    pub duration_ms: u64,
}

impl ScriptSegment {
    pub fn new(label: Option<GestureLabel>, duration_ms: u64) -> Self {
        Self { label, duration_ms }
    }
}

/// Configuration for a synthetic source.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub name: String,
    pub script: Vec<ScriptSegment>,
    pub frame_interval_ms: u64,
    pub realtime: bool,
    pub seed: u64,
}

impl SyntheticConfig {
    pub fn from_settings(settings: &SourceSettings) -> Result<Self> {
        if settings.target_fps == 0 {
            return Err(anyhow!("target_fps must be >= 1"));
        }
        Ok(Self {
            name: settings.uri.clone(),
            script: parse_script(&settings.uri)?,
            frame_interval_ms: (1_000 / settings.target_fps as u64).max(1),
            realtime: settings.realtime,
            seed: settings.seed,
        })
    }
}

/// Parse a `stub://` URI into script segments.
pub fn parse_script(uri: &str) -> Result<Vec<ScriptSegment>> {
    let body = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| anyhow!("synthetic source URI must start with {}", SCHEME))?;
    let body = if body == "demo" { DEMO_SCRIPT } else { body };

    let script = body
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_segment)
        .collect::<Result<Vec<_>>>()?;
    if script.is_empty() {
        return Err(anyhow!("synthetic script {} has no segments", uri));
    }
    Ok(script)
}

fn parse_segment(entry: &str) -> Result<ScriptSegment> {
    let (label, duration) = match entry.split_once(':') {
        Some((label, ms)) => {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid duration in script segment '{}'", entry))?;
            (label, ms)
        }
        None => (entry, DEFAULT_SEGMENT_MS),
    };
    if duration == 0 {
        return Err(anyhow!("script segment '{}' has zero duration", entry));
    }
    let label = match label.trim() {
        "none" => None,
        other => Some(other.parse::<GestureLabel>()?),
    };
    Ok(ScriptSegment::new(label, duration))
}

/// Scripted pose generator.
pub struct SyntheticSource {
    config: SyntheticConfig,
    segment_ends: Vec<u64>,
    rng: StdRng,
    next_t_ms: u64,
    connected: bool,
    stats: SourceStats,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        let segment_ends = config
            .script
            .iter()
            .scan(0u64, |end, seg| {
                *end += seg.duration_ms;
                Some(*end)
            })
            .collect();
        let stats = SourceStats {
            source: config.name.clone(),
            ..SourceStats::default()
        };
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            segment_ends,
            next_t_ms: 0,
            connected: false,
            stats,
        }
    }

    /// Total scripted duration.
    pub fn duration_ms(&self) -> u64 {
        self.segment_ends.last().copied().unwrap_or(0)
    }

    fn segment_at(&self, t_ms: u64) -> Option<&ScriptSegment> {
        let idx = self.segment_ends.iter().position(|&end| t_ms < end)?;
        self.config.script.get(idx)
    }
}

impl LandmarkSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn connect(&mut self, facing: Facing) -> Result<()> {
        // A finished script plays again from the top; a partial one resumes.
        if self.next_t_ms >= self.duration_ms() {
            self.next_t_ms = 0;
        }
        self.connected = true;
        log::info!(
            "SyntheticSource: connected to {} (facing {}, {} ms script)",
            self.config.name,
            facing,
            self.duration_ms()
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if !self.connected {
            return Err(anyhow!("synthetic source {} is not connected", self.config.name));
        }
        let t_ms = self.next_t_ms;
        let Some(segment) = self.segment_at(t_ms).copied() else {
            return Ok(None);
        };

        if self.config.realtime && t_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.frame_interval_ms));
        }

        let hand = segment
            .label
            .map(|label| pose::jittered(&pose::for_label(label), &mut self.rng));
        self.next_t_ms += self.config.frame_interval_ms;
        self.stats.frames_delivered += 1;
        if hand.is_some() {
            self.stats.hands_seen += 1;
        }
        Ok(Some(Frame::new(t_ms, hand)))
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            log::info!("SyntheticSource: released {}", self.config.name);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        self.stats.clone()
    }
}
