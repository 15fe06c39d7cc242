//! Infrastructure layer for toolgate
//!
//! Configuration file loading and logging setup.

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigSource, ConfigWarning, FileConfig, FilePermissionsConfig};
pub use logging::{LoggingConfig, LoggingError, init_logging};
