//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::game::CanvasSize;
use crate::util::time::DEFAULT_TARGET_FPS;

/// Engine configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// JSON-lines landmark feed to replay
    pub frame_feed: PathBuf,
    /// Frames fed to the match per second
    pub target_fps: u32,
    /// Publish a snapshot every N frames
    pub snapshot_interval: u32,
    /// Print snapshots to stdout as JSON lines
    pub emit_snapshots: bool,

    /// Canvas size used when a frame does not carry one
    pub canvas: CanvasSize,
    /// Seed for area-attack jitter; random when unset
    pub match_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CanvasSize::default();

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            frame_feed: lookup("FRAME_FEED")
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing("FRAME_FEED"))?,
            target_fps: parse_or(&lookup, "TARGET_FPS", DEFAULT_TARGET_FPS)?,
            snapshot_interval: parse_or(&lookup, "SNAPSHOT_INTERVAL", 1)?,
            emit_snapshots: parse_or(&lookup, "EMIT_SNAPSHOTS", true)?,

            canvas: CanvasSize {
                width: parse_or(&lookup, "CANVAS_WIDTH", defaults.width)?,
                height: parse_or(&lookup, "CANVAS_HEIGHT", defaults.height)?,
            },
            match_seed: lookup("MATCH_SEED")
                .map(|v| v.parse().map_err(|_| ConfigError::Invalid("MATCH_SEED")))
                .transpose()?,
        })
        .and_then(Self::validated)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("TARGET_FPS"));
        }
        if self.canvas.width <= 0.0 {
            return Err(ConfigError::Invalid("CANVAS_WIDTH"));
        }
        if self.canvas.height <= 0.0 {
            return Err(ConfigError::Invalid("CANVAS_HEIGHT"));
        }
        Ok(self)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("FRAME_FEED", "feed.jsonl")])).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.target_fps, DEFAULT_TARGET_FPS);
        assert_eq!(config.snapshot_interval, 1);
        assert_eq!(config.canvas, CanvasSize::default());
        assert!(config.match_seed.is_none());
        assert!(config.emit_snapshots);
    }

    #[test]
    fn test_missing_feed() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("FRAME_FEED")));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("FRAME_FEED", "f"), ("TARGET_FPS", "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TARGET_FPS")));

        let err = Config::from_lookup(lookup(&[("FRAME_FEED", "f"), ("CANVAS_WIDTH", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("CANVAS_WIDTH")));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FRAME_FEED", "f"),
            ("MATCH_SEED", "42"),
            ("CANVAS_WIDTH", "640"),
            ("SNAPSHOT_INTERVAL", "3"),
        ]))
        .unwrap();
        assert_eq!(config.match_seed, Some(42));
        assert_eq!(config.canvas.width, 640.0);
        assert_eq!(config.snapshot_interval, 3);
    }
}
