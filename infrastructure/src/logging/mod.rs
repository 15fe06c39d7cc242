//! Logging setup: a `tracing_subscriber::fmt` subscriber filtered by
//! [`EnvFilter`].
//!
//! `RUST_LOG` wins over the configured level when set. An explicit
//! `filter` directive wins over both.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Raw logging configuration from TOML (`[logging]` section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `filter` nor `RUST_LOG` is set
    pub level: String,
    /// Full `EnvFilter` directive, e.g. `toolgate_application=debug,warn`
    pub filter: Option<String>,
    /// Show the module target in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            filter: None,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// Level for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.to_string(),
            ..Self::default()
        }
    }

    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Some(directive) = &self.filter {
            return EnvFilter::try_new(directive).map_err(|e| LoggingError::InvalidFilter {
                directive: directive.clone(),
                message: e.to_string(),
            });
        }
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::InvalidFilter {
            directive: self.level.clone(),
            message: e.to_string(),
        })
    }
}

/// Install the global subscriber. A second call returns an error.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.with_target)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
