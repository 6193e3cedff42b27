//! Subscriber setup for applications embedding coordkit
//!
//! The library itself only emits `tracing` events. Lifecycle transitions and
//! stack operations are logged at `debug`, ignored requests at `trace`, and
//! a navigation stack that lost sync with its host at `error`. Applications
//! that do not install their own subscriber can use this module.
//!
//! # Examples
//!
//! ```no_run
//! use libcoordkit::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Pretty, "libcoordkit=debug".to_string(), false).init();
//!
//! // Or read COORDKIT_LOG_FORMAT / COORDKIT_LOG_LEVEL
//! libcoordkit::logging::init_default();
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain single-line output
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line, colored output for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Settings for the global subscriber
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter directive, e.g. `info` or `libcoordkit=trace`
    pub level: String,
    /// Forces `debug` when `RUST_LOG` is unset
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Filter for the subscriber. `RUST_LOG` takes precedence.
    pub fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    /// Install the global subscriber, writing to stderr
    ///
    /// Returns false if a subscriber was already installed.
    pub fn init(&self) -> bool {
        let filter = self.filter();
        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_target(true)
                .with_current_span(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(false)
                .try_init(),
        };
        installed.is_ok()
    }
}

/// Install a subscriber from `COORDKIT_LOG_FORMAT` and `COORDKIT_LOG_LEVEL`
///
/// Unset or unparseable values fall back to text output at `info`.
pub fn init_default() -> bool {
    let format = std::env::var("COORDKIT_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let level = std::env::var("COORDKIT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    LoggingConfig::new(format, level, false).init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_from_str_invalid() {
        let err = "yaml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("Invalid log format: 'yaml'"));
    }

    #[test]
    fn test_log_format_display_round_trips() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(format, LogFormat::Pretty);
        assert!(serde_json::from_str::<LogFormat>("\"loud\"").is_err());
    }

    #[test]
    #[serial]
    fn test_filter_uses_level_without_rust_log() {
        std::env::remove_var("RUST_LOG");

        let quiet = LoggingConfig::new(LogFormat::Text, "warn".to_string(), false);
        assert_eq!(quiet.filter().max_level_hint(), Some(LevelFilter::WARN));

        let verbose = LoggingConfig::new(LogFormat::Text, "warn".to_string(), true);
        assert_eq!(verbose.filter().max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    #[serial]
    fn test_second_init_reports_existing_subscriber() {
        let config = LoggingConfig::new(LogFormat::Text, "error".to_string(), false);
        config.init();
        assert!(!config.init());
    }
}
