//! Configuration management for reel.
//!
//! Loads configuration from ${REEL_HOME}/config.toml with sensible defaults.
//! A missing file is not an error — every field has a default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::player::sequencer::{REVEAL_GAP, TYPING_DELAY_MAX, TYPING_DELAY_MIN};
use crate::player::UniformDelaySource;
use crate::story::Language;

/// Playback timing knobs, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Shortest simulated typing delay.
    pub typing_delay_min_ms: u64,
    /// Longest simulated typing delay (exclusive).
    pub typing_delay_max_ms: u64,
    /// Pause between a reveal and the next typing indicator.
    pub reveal_gap_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typing_delay_min_ms: TYPING_DELAY_MIN.as_millis() as u64,
            typing_delay_max_ms: TYPING_DELAY_MAX.as_millis() as u64,
            reveal_gap_ms: REVEAL_GAP.as_millis() as u64,
        }
    }
}

impl TimingConfig {
    /// Builds the production delay source for these timings.
    pub fn delay_source(&self) -> UniformDelaySource {
        UniformDelaySource::new(
            Duration::from_millis(self.typing_delay_min_ms),
            Duration::from_millis(self.typing_delay_max_ms),
            Duration::from_millis(self.reveal_gap_ms),
        )
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Story played when none is given on the command line.
    pub story: String,
    /// Language used when none is given on the command line.
    pub language: Language,
    /// Extra directory of story files; entries add to or replace the
    /// embedded stories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stories_dir: Option<PathBuf>,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            story: "welcome".to_string(),
            language: Language::En,
            stories_dir: None,
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config file, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = paths::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config at {}", path.display()))
    }

    /// The effective configuration as TOML (for `reel config show`).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    /// Writes a starter config file; refuses to overwrite an existing one.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, STARTER_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Starter config written by `reel config init`; optional knobs commented.
const STARTER_CONFIG: &str = r#"# Default story and language for `reel`.
story = "welcome"
language = "en"

# Extra directory of story JSON files.
# stories_dir = "/path/to/stories"

[timing]
# Milliseconds; the typing delay is drawn uniformly from [min, max).
# typing_delay_min_ms = 500
# typing_delay_max_ms = 3000
# reveal_gap_ms = 300
"#;

/// Filesystem locations used by reel.
pub mod paths {
    use std::path::PathBuf;

    /// The user's home directory, if known.
    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(PathBuf::from)
    }

    /// Root data directory: $REEL_HOME, falling back to ~/.reel.
    pub fn reel_home() -> PathBuf {
        if let Some(home) = std::env::var_os("REEL_HOME") {
            return PathBuf::from(home);
        }
        home_dir()
            .map(|home| home.join(".reel"))
            .unwrap_or_else(|| PathBuf::from(".reel"))
    }

    pub fn config_path() -> PathBuf {
        reel_home().join("config.toml")
    }

    pub fn logs_dir() -> PathBuf {
        reel_home().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let back: Config = toml::from_str(&toml).unwrap();
        assert_eq!(back.story, "welcome");
        assert_eq!(back.language, Language::En);
        assert_eq!(back.timing, TimingConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str("story = \"launch\"").unwrap();
        assert_eq!(config.story, "launch");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.timing.reveal_gap_ms, 300);
    }

    #[test]
    fn test_starter_config_parses() {
        let config: Config = toml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.story, "welcome");
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::init(&path).unwrap();
        assert!(path.exists());
        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_timing_overrides_parse() {
        let config: Config = toml::from_str(
            "[timing]\ntyping_delay_min_ms = 10\ntyping_delay_max_ms = 20\nreveal_gap_ms = 5\n",
        )
        .unwrap();
        assert_eq!(config.timing.typing_delay_min_ms, 10);
        assert_eq!(config.timing.typing_delay_max_ms, 20);
        assert_eq!(config.timing.reveal_gap_ms, 5);
    }
}
