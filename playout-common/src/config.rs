//! Configuration file resolution and shared config sections
//!
//! Config file lookup follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`PLAYOUT_CONFIG`)
//! 3. Per-user config file (`<config dir>/playout/config.toml`)
//! 4. Built-in defaults (no file at all)
//!
//! A missing file is never fatal: the caller logs a warning and runs with
//! defaults. A file that exists but cannot be read or parsed is an error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLAYOUT_CONFIG";

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "playout";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where a resolved config path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    UserConfigDir,
}

/// Config file resolver
pub struct ConfigFileResolver {
    module_name: String,
}

impl ConfigFileResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Resolve the config file path, or `None` when only defaults apply.
    ///
    /// CLI and environment paths are returned even if the file does not
    /// exist, so the loader can report the operator's mistake. The per-user
    /// path is only returned when present.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
        if let Some(path) = cli_arg {
            return Some((path.to_path_buf(), ConfigSource::CommandLine));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), ConfigSource::Environment));
            }
        }

        let user_config = Self::user_config_path()?;
        if user_config.exists() {
            return Some((user_config, ConfigSource::UserConfigDir));
        }

        None
    }

    /// Per-user config file location for the current platform
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Resolve and load a TOML config, falling back to `T::default()`.
    pub fn load<T>(&self, cli_arg: Option<&Path>) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.resolve(cli_arg) {
            Some((path, source)) => {
                if !path.exists() && source != ConfigSource::UserConfigDir {
                    return Err(Error::Config(format!(
                        "Config file not found: {} (from {:?})",
                        path.display(),
                        source
                    )));
                }
                let config = load_toml_file(&path)?;
                info!(
                    "{}: loaded configuration from {} ({:?})",
                    self.module_name,
                    path.display(),
                    source
                );
                Ok(config)
            }
            None => {
                warn!(
                    "{}: no configuration file found, using built-in defaults",
                    self.module_name
                );
                Ok(T::default())
            }
        }
    }
}

/// Read and parse a TOML file
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse TOML in {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_cli_path_wins() {
        let resolver = ConfigFileResolver::new("test-module");
        let (path, source) = resolver
            .resolve(Some(Path::new("/tmp/explicit.toml")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.toml"));
        assert_eq!(source, ConfigSource::CommandLine);
    }

    #[test]
    fn test_logging_section_parses() {
        let parsed: LoggingConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(parsed.level, "debug");

        let defaulted: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(defaulted, LoggingConfig::default());
    }
}
