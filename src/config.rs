//! Configuration loading and management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cue::CueTable;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV: &str = "GESTURE_CUE_CONFIG";

/// Environment variable naming a prediction file to replay instead of stdin
pub const INPUT_ENV: &str = "GESTURE_CUE_INPUT";

/// Tuning of the detection stabilizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Smoothed probability at or above which a class counts as detected
    pub confidence_threshold: f32,

    /// Smoothed probability above which a class is not allowed to trigger
    pub max_threshold: f32,

    /// How long a class must stay detected before its cue fires
    pub hold_time_ms: u64,

    /// Minimum spacing between two cues of the same class
    pub cooldown_ms: u64,

    /// Number of recent probabilities averaged per class
    pub buffer_size: usize,

    /// How long a confirmed detection stays on display
    pub display_hold_ms: u64,

    /// Minimum time between neutral transitions
    pub neutral_hold_ms: u64,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.9,
            max_threshold: 1.0,
            hold_time_ms: 2000,
            cooldown_ms: 4000,
            buffer_size: 5,
            display_hold_ms: 5000,
            neutral_hold_ms: 500,
        }
    }
}

impl StabilizerConfig {
    pub fn hold_time(&self) -> Duration {
        Duration::from_millis(self.hold_time_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn display_hold(&self) -> Duration {
        Duration::from_millis(self.display_hold_ms)
    }

    pub fn neutral_hold(&self) -> Duration {
        Duration::from_millis(self.neutral_hold_ms)
    }

    /// Reject settings the stabilizer cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.buffer_size > 0, "buffer_size must be at least 1");
        ensure!(
            self.confidence_threshold.is_finite() && self.max_threshold.is_finite(),
            "thresholds must be finite"
        );
        ensure!(
            self.confidence_threshold <= self.max_threshold,
            "confidence_threshold ({}) is above max_threshold ({})",
            self.confidence_threshold,
            self.max_threshold
        );
        Ok(())
    }
}

/// Daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stabilizer tuning
    pub stabilizer: StabilizerConfig,

    /// Sound and image assets per class
    pub cues: CueTable,

    /// Prediction file to replay; stdin when unset
    pub input_path: Option<PathBuf>,

    /// Release at most one frame per interval when replaying
    pub frame_interval_ms: Option<u64>,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(input) = std::env::var_os(INPUT_ENV) {
            config.input_path = Some(PathBuf::from(input));
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.stabilizer.validate().context("invalid stabilizer config")
    }

    /// Frame pacing for replayed input
    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stabilizer_config() {
        let config = StabilizerConfig::default();
        assert_eq!(config.hold_time(), Duration::from_millis(2000));
        assert_eq!(config.cooldown(), Duration::from_millis(4000));
        assert_eq!(config.buffer_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{"stabilizer":{"hold_time_ms":1500},"frame_interval_ms":33}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.stabilizer.hold_time_ms, 1500);
        assert_eq!(config.stabilizer.cooldown_ms, 4000);
        assert_eq!(config.frame_interval(), Some(Duration::from_millis(33)));
        assert!(config.cues.cue("Start").is_some());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = StabilizerConfig {
            buffer_size: 0,
            ..StabilizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = StabilizerConfig {
            confidence_threshold: 0.95,
            max_threshold: 0.9,
            ..StabilizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("gesture-cue-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"input_path":"session.jsonl"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.input_path, Some(PathBuf::from("session.jsonl")));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Config::from_file(Path::new("/nonexistent/gesture-cue.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
