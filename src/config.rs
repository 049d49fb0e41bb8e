//! Game configuration
//!
//! Loaded from `webgrid.toml`; a missing file means defaults. The metric
//! and timing policies are configuration choices rather than compile-time
//! forks of the state machine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::metrics::{MetricPolicy, TimingSource};

/// Environment variable consulted for the STT API key when the config
/// file does not carry one.
pub const STT_API_KEY_ENV: &str = "WEBGRID_STT_API_KEY";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Grid side length (the classic task uses 10x10).
    #[serde(default = "default_grid_size")]
    pub grid_size: u8,
    /// Session length in seconds.
    #[serde(default = "default_session_secs")]
    pub session_secs: u32,
    /// How moves convert into bits.
    #[serde(default = "default_metric_policy")]
    pub metric_policy: MetricPolicy,
    /// Which clock elapsed time is read from.
    #[serde(default = "default_timing_source")]
    pub timing_source: TimingSource,
    /// Voice input settings.
    #[serde(default)]
    pub stt: SttConfig,
}

fn default_grid_size() -> u8 {
    10
}

fn default_session_secs() -> u32 {
    40
}

fn default_metric_policy() -> MetricPolicy {
    MetricPolicy::PerMove
}

fn default_timing_source() -> TimingSource {
    TimingSource::Countdown
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            session_secs: default_session_secs(),
            metric_policy: default_metric_policy(),
            timing_source: default_timing_source(),
            stt: SttConfig::default(),
        }
    }
}

/// Which transcription backend to use, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SttMode {
    /// Keyboard only.
    #[default]
    Off,
    /// POST chunked WAV buffers to a relay endpoint.
    Http,
    /// Persistent streaming connection with partial/final transcripts.
    Stream,
}

/// `[stt]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SttConfig {
    #[serde(default)]
    pub mode: SttMode,
    /// HTTP endpoint URL or `host:port` for the streaming connection.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer key for the relay; `WEBGRID_STT_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Path to a file or FIFO carrying raw little-endian PCM16 audio
    /// (e.g. fed by `arecord`). Microphone capture stays outside the game.
    #[serde(default)]
    pub pcm_path: Option<String>,
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
    /// Audio chunk length sent per transcription request.
    #[serde(default = "default_chunk_ms")]
    pub chunk_ms: u32,
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_channels() -> u16 {
    1
}

fn default_chunk_ms() -> u32 {
    3_000
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            mode: SttMode::Off,
            endpoint: None,
            api_key: None,
            pcm_path: None,
            sample_rate_hz: default_sample_rate(),
            channels: default_channels(),
            chunk_ms: default_chunk_ms(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        config.validate()?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            anyhow::bail!("grid_size must be at least 1");
        }
        if self.session_secs == 0 {
            anyhow::bail!("session_secs must be at least 1");
        }
        if self.stt.mode != SttMode::Off && self.stt.chunk_ms == 0 {
            anyhow::bail!("stt.chunk_ms must be at least 1");
        }
        Ok(())
    }

    /// The STT API key, environment taking precedence over the file.
    pub fn stt_api_key(&self) -> Option<String> {
        std::env::var(STT_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.stt.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.session_secs, 40);
        assert_eq!(config.metric_policy, MetricPolicy::PerMove);
        assert_eq!(config.timing_source, TimingSource::Countdown);
        assert_eq!(config.stt.mode, SttMode::Off);
        assert_eq!(config.stt.sample_rate_hz, 16_000);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            grid_size = 8
            session_secs = 60
            metric_policy = "distance_weighted"
            timing_source = "wall_clock"

            [stt]
            mode = "http"
            endpoint = "http://localhost:9000/transcribe"
            pcm_path = "/tmp/webgrid.pcm"
            chunk_ms = 2000
            "#,
        )
        .unwrap();
        assert_eq!(config.grid_size, 8);
        assert_eq!(config.metric_policy, MetricPolicy::DistanceWeighted);
        assert_eq!(config.timing_source, TimingSource::WallClock);
        assert_eq!(config.stt.mode, SttMode::Http);
        assert_eq!(
            config.stt.endpoint.as_deref(),
            Some("http://localhost:9000/transcribe")
        );
        assert_eq!(config.stt.chunk_ms, 2000);
        // Unset fields keep their defaults.
        assert_eq!(config.stt.channels, 1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("session_secs = 20").unwrap();
        assert_eq!(config.session_secs, 20);
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.stt.mode, SttMode::Off);
    }

    #[test]
    fn test_zero_grid_rejected() {
        let config: Config = toml::from_str("grid_size = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let config = Config::load("/nonexistent/webgrid.toml").unwrap();
        assert_eq!(config.grid_size, 10);
    }
}
