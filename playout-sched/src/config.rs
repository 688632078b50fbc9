//! Configuration for playout-sched
//!
//! Single-tier TOML bootstrap file. Every field has a built-in default, so
//! an absent file (or an absent section) is valid. See
//! `playout_common::config` for how the file is located.
//!
//! ```toml
//! [scheduler]
//! poll_interval_ms = 500
//! switcher_timeout_ms = 3000
//! stop_join_timeout_ms = 2000
//! auto_stop_when_exhausted = false
//! event_channel_capacity = 100
//!
//! [naming]
//! scene_name_chars = 20
//!
//! [probe]
//! ffprobe_path = "ffprobe"
//! timeout_ms = 10000
//! fallback_seconds = 60.0
//! minimum_estimate_seconds = 30.0
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::{Error, Result};
use crate::switcher::{SceneNaming, DEFAULT_SCENE_NAME_CHARS};
use playout_common::config::{ConfigFileResolver, LoggingConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Broadcast controller settings
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Poll loop period
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Upper bound on any single scene switcher call
    #[serde(default = "default_switcher_timeout_ms")]
    pub switcher_timeout_ms: u64,

    /// How long `stop()` waits for the poll task to exit
    #[serde(default = "default_stop_join_timeout_ms")]
    pub stop_join_timeout_ms: u64,

    /// Return to Idle automatically once the playlist is exhausted
    #[serde(default)]
    pub auto_stop_when_exhausted: bool,

    /// Status events buffered per subscriber
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

/// Scene naming settings
#[derive(Debug, Clone, Deserialize)]
pub struct NamingConfig {
    /// Display-name characters kept in generated scene names
    #[serde(default = "default_scene_name_chars")]
    pub scene_name_chars: usize,
}

/// Duration probe settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,

    /// Used when ffprobe cannot be run at all
    #[serde(default = "default_fallback_seconds")]
    pub fallback_seconds: f64,

    /// Floor for the file-size estimate when ffprobe fails on a file
    #[serde(default = "default_minimum_estimate_seconds")]
    pub minimum_estimate_seconds: f64,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_switcher_timeout_ms() -> u64 {
    3000
}

fn default_stop_join_timeout_ms() -> u64 {
    2000
}

fn default_event_channel_capacity() -> usize {
    100
}

fn default_scene_name_chars() -> usize {
    DEFAULT_SCENE_NAME_CHARS
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_probe_timeout_ms() -> u64 {
    10_000
}

fn default_fallback_seconds() -> f64 {
    60.0
}

fn default_minimum_estimate_seconds() -> f64 {
    30.0
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            switcher_timeout_ms: default_switcher_timeout_ms(),
            stop_join_timeout_ms: default_stop_join_timeout_ms(),
            auto_stop_when_exhausted: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            scene_name_chars: default_scene_name_chars(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
            timeout_ms: default_probe_timeout_ms(),
            fallback_seconds: default_fallback_seconds(),
            minimum_estimate_seconds: default_minimum_estimate_seconds(),
        }
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn switcher_timeout(&self) -> Duration {
        Duration::from_millis(self.switcher_timeout_ms)
    }

    pub fn stop_join_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_join_timeout_ms)
    }
}

impl NamingConfig {
    pub fn scene_naming(&self) -> SceneNaming {
        SceneNaming::new(self.scene_name_chars)
    }
}

impl TomlConfig {
    /// Locate and load the config file (CLI > env > user dir > defaults)
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let config: TomlConfig = ConfigFileResolver::new("playout-sched").load(cli_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.poll_interval_ms == 0 {
            return Err(Error::Config("scheduler.poll_interval_ms must be > 0".to_string()));
        }
        if self.scheduler.switcher_timeout_ms == 0 {
            return Err(Error::Config("scheduler.switcher_timeout_ms must be > 0".to_string()));
        }
        if self.naming.scene_name_chars == 0 {
            return Err(Error::Config("naming.scene_name_chars must be > 0".to_string()));
        }
        if !(self.probe.fallback_seconds.is_finite() && self.probe.fallback_seconds > 0.0) {
            return Err(Error::Config("probe.fallback_seconds must be > 0".to_string()));
        }
        if !(self.probe.minimum_estimate_seconds.is_finite()
            && self.probe.minimum_estimate_seconds > 0.0)
        {
            return Err(Error::Config("probe.minimum_estimate_seconds must be > 0".to_string()));
        }
        Ok(())
    }
}
