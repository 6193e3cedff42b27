//! Configuration management for coordkit
//!
//! Every section and field is optional. A missing file at the default
//! location yields [`Config::default_config`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::logging::{LogFormat, LoggingConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub logging: LoggingSection,
}

/// Behaviour of navigation coordinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Animate the pop performed when a pushed flow requests dismissal
    pub animate_dismissal: bool,
    pub desync_policy: DesyncPolicy,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            animate_dismissal: true,
            desync_policy: DesyncPolicy::Reset,
        }
    }
}

/// What to do when the host shows a presentable the coordinator never tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesyncPolicy {
    /// Log, forget the root and report `NavigationError::LostSync`
    #[default]
    Reset,
    /// Treat it as a programming error
    Panic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// Falls back to defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Logging settings from the `[logging]` section
    pub fn logging_config(&self, verbose: bool) -> LoggingConfig {
        LoggingConfig::new(self.logging.format, self.logging.level.clone(), verbose)
    }
}

/// Resolve the configuration file path
///
/// `COORDKIT_CONFIG` wins (with `~` expanded), otherwise
/// `<config_dir>/coordkit/config.toml`.
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("COORDKIT_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("coordkit").join("config.toml"))
}
