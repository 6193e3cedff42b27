//! Error types for coordkit
//!
//! Lifecycle and stack requests that fail their precondition are ignored,
//! not reported. The variants here cover the remaining failures: loading
//! configuration, instantiating presentables and losing track of the host
//! navigation stack.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Presentable error: {0}")]
    Presentable(#[from] PresentableError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The host reported a visible presentable that is not on the
    /// bookkeeping stack. Every tracked flow was drained looking for it.
    #[error("Lost sync with host stack: visible presentable not tracked ({drained} flows drained)")]
    LostSync { drained: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresentableError {
    #[error("No storyboard entry for identifier '{identifier}'")]
    StoryboardEntryMissing { identifier: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_lost_sync() {
        let error = CoordinatorError::Navigation(NavigationError::LostSync { drained: 3 });
        let message = format!("{}", error);
        assert_eq!(
            message,
            "Navigation error: Lost sync with host stack: visible presentable not tracked (3 flows drained)"
        );
    }

    #[test]
    fn test_error_message_formatting_storyboard() {
        let error = CoordinatorError::Presentable(PresentableError::StoryboardEntryMissing {
            identifier: "LoginScreen".to_string(),
        });
        let message = format!("{}", error);
        assert_eq!(
            message,
            "Presentable error: No storyboard entry for identifier 'LoginScreen'"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let config_error = ConfigError::MissingField("config directory".to_string());
        let error = CoordinatorError::Config(config_error);
        let message = format!("{}", error);
        assert_eq!(
            message,
            "Configuration error: Missing required field: config directory"
        );
    }

    #[test]
    fn test_error_conversion_from_navigation_error() {
        let error: CoordinatorError = NavigationError::LostSync { drained: 0 }.into();

        match error {
            CoordinatorError::Navigation(NavigationError::LostSync { drained }) => {
                assert_eq!(drained, 0);
            }
            _ => panic!("Expected CoordinatorError::Navigation"),
        }
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let config_error: ConfigError = io_error.into();
        let error: CoordinatorError = config_error.into();

        match error {
            CoordinatorError::Config(ConfigError::ReadError(_)) => {
                // Success - correct conversion
            }
            _ => panic!("Expected CoordinatorError::Config"),
        }
    }
}
