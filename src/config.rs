use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::classify::ThumbRule;
use crate::hold::DEFAULT_HOLD_MS;
use crate::ingest::{synthetic::DEMO_URI, Facing, SourceSettings};
use crate::session::SessionConfig;
use crate::stats::DEFAULT_RATE_WINDOW_MS;

const DEFAULT_TARGET_FPS: u32 = 30;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct HandwordConfigFile {
    source: Option<SourceConfigFile>,
    session: Option<SessionConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SourceConfigFile {
    uri: Option<String>,
    target_fps: Option<u32>,
    realtime: Option<bool>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SessionConfigFile {
    hold_ms: Option<u64>,
    rate_window_ms: Option<u64>,
    thumb_rule: Option<ThumbRule>,
    facing: Option<Facing>,
    emit_frame_events: Option<bool>,
    auto_start: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct HandwordConfig {
    pub source: SourceSettings,
    pub session: SessionConfig,
    /// Request a session start as soon as the daemon is up.
    pub auto_start: bool,
}

impl HandwordConfig {
    /// Defaults, then the file named by `HANDWORD_CONFIG`, then environment
    /// overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("HANDWORD_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: HandwordConfigFile) -> Self {
        let source = file.source.unwrap_or_default();
        let session = file.session.unwrap_or_default();
        Self {
            source: SourceSettings {
                uri: source.uri.unwrap_or_else(|| DEMO_URI.to_string()),
                target_fps: source.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
                realtime: source.realtime.unwrap_or(false),
                seed: source.seed.unwrap_or(0),
            },
            session: SessionConfig {
                hold_ms: session.hold_ms.unwrap_or(DEFAULT_HOLD_MS),
                rate_window_ms: session.rate_window_ms.unwrap_or(DEFAULT_RATE_WINDOW_MS),
                thumb_rule: session.thumb_rule.unwrap_or_default(),
                facing: session.facing.unwrap_or_default(),
                emit_frame_events: session.emit_frame_events.unwrap_or(false),
            },
            auto_start: session.auto_start.unwrap_or(true),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(uri) = std::env::var("HANDWORD_SOURCE") {
            if !uri.trim().is_empty() {
                self.source.uri = uri.trim().to_string();
            }
        }
        if let Ok(facing) = std::env::var("HANDWORD_FACING") {
            self.session.facing = facing.parse()?;
        }
        if let Ok(hold) = std::env::var("HANDWORD_HOLD_MS") {
            self.session.hold_ms = hold
                .trim()
                .parse()
                .map_err(|_| anyhow!("HANDWORD_HOLD_MS must be an integer number of milliseconds"))?;
        }
        if let Ok(window) = std::env::var("HANDWORD_RATE_WINDOW_MS") {
            self.session.rate_window_ms = window.trim().parse().map_err(|_| {
                anyhow!("HANDWORD_RATE_WINDOW_MS must be an integer number of milliseconds")
            })?;
        }
        if let Ok(rule) = std::env::var("HANDWORD_THUMB_RULE") {
            self.session.thumb_rule = rule.parse()?;
        }
        if let Ok(flag) = std::env::var("HANDWORD_EMIT_FRAME_EVENTS") {
            self.session.emit_frame_events = parse_bool("HANDWORD_EMIT_FRAME_EVENTS", &flag)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.source.uri.trim().is_empty() {
            return Err(anyhow!("source uri must not be empty"));
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("target_fps must be greater than zero"));
        }
        if self.session.hold_ms == 0 {
            return Err(anyhow!("hold_ms must be greater than zero"));
        }
        if self.session.rate_window_ms == 0 {
            return Err(anyhow!("rate_window_ms must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for HandwordConfig {
    fn default() -> Self {
        Self::from_file(HandwordConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<HandwordConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{} must be a boolean", name)),
    }
}
