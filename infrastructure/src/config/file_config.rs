//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Tier names stay strings here and are parsed into domain types on
//! conversion, so a typo surfaces as a [`ConfigError`] naming the field.
//!
//! ```toml
//! [permissions]
//! granted_tiers = ["read_only", "timer_control"]
//! auto_approve = ["start_timer", "stop_timer"]
//! confirmation_timeout_seconds = 30
//!
//! [logging]
//! level = "info"
//! with_target = false
//! ```

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use toolgate_application::ExecutionOrchestrator;
use toolgate_domain::permission::preferences::DEFAULT_CONFIRMATION_TIMEOUT_SECONDS;
use toolgate_domain::{ExecutionPreferences, PermissionTier, TierSet, ToolCatalog};
use tracing::warn;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Extract(Box::new(e))
    }
}

/// A non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Permission tiers and confirmation behaviour
    pub permissions: FilePermissionsConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Raw permission configuration from TOML (`[permissions]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePermissionsConfig {
    /// Tier names (`read_only` or `ReadOnly` form)
    pub granted_tiers: Vec<String>,
    /// Tools that skip the confirmation prompt
    pub auto_approve: Vec<String>,
    pub confirmation_timeout_seconds: u64,
}

impl Default for FilePermissionsConfig {
    fn default() -> Self {
        Self {
            granted_tiers: vec![PermissionTier::ReadOnly.snake_case().to_string()],
            auto_approve: Vec::new(),
            confirmation_timeout_seconds: DEFAULT_CONFIRMATION_TIMEOUT_SECONDS,
        }
    }
}

impl FilePermissionsConfig {
    /// Parse the tier names.
    pub fn granted_tiers(&self) -> Result<TierSet, ConfigError> {
        self.granted_tiers
            .iter()
            .map(|name| {
                name.parse::<PermissionTier>().map_err(|e| ConfigError::Invalid {
                    field: "permissions.granted_tiers".to_string(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

impl FileConfig {
    /// Check the configuration against a catalogue.
    ///
    /// Unknown auto-approve names are warnings; a zero timeout or an
    /// unparseable tier is an error.
    pub fn validate(&self, catalog: &ToolCatalog) -> Result<Vec<ConfigWarning>, ConfigError> {
        if self.permissions.confirmation_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "permissions.confirmation_timeout_seconds".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        self.permissions.granted_tiers()?;

        let warnings = self
            .permissions
            .auto_approve
            .iter()
            .filter(|name| !catalog.contains(name))
            .map(|name| ConfigWarning {
                field: "permissions.auto_approve".to_string(),
                message: format!("unknown tool '{}' is ignored", name),
            })
            .collect();
        Ok(warnings)
    }

    pub fn to_preferences(&self) -> Result<ExecutionPreferences, ConfigError> {
        Ok(ExecutionPreferences::default()
            .with_granted_tiers(self.permissions.granted_tiers()?)
            .with_auto_approve(self.permissions.auto_approve.iter().cloned())
            .with_confirmation_timeout(self.permissions.confirmation_timeout_seconds))
    }

    /// Validate, log warnings and build an orchestrator over `catalog`.
    pub fn build_orchestrator(&self, catalog: Arc<ToolCatalog>) -> Result<ExecutionOrchestrator, ConfigError> {
        for warning in self.validate(&catalog)? {
            warn!(field = %warning.field, "Configuration warning: {}", warning.message);
        }
        Ok(ExecutionOrchestrator::new(catalog, self.to_preferences()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[permissions]
granted_tiers = ["read_only", "TimerControl"]
auto_approve = ["start_timer"]
confirmation_timeout_seconds = 10

[logging]
level = "debug"
with_target = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.permissions.granted_tiers().unwrap(),
            [PermissionTier::ReadOnly, PermissionTier::TimerControl].into()
        );
        assert_eq!(config.permissions.auto_approve, vec!["start_timer"]);
        assert_eq!(config.permissions.confirmation_timeout_seconds, 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.with_target);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[permissions]\nauto_approve = [\"stop_timer\"]\n").unwrap();

        assert_eq!(
            config.permissions.granted_tiers().unwrap(),
            [PermissionTier::ReadOnly].into()
        );
        assert_eq!(config.permissions.confirmation_timeout_seconds, 30);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_default_config_matches_default_preferences() {
        let preferences = FileConfig::default().to_preferences().unwrap();
        assert_eq!(preferences, ExecutionPreferences::default());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate(&ToolCatalog::standard()).unwrap().is_empty());
    }

    #[test]
    fn test_validate_warns_on_unknown_auto_approve() {
        let mut config = FileConfig::default();
        config.permissions.auto_approve = vec!["start_timer".into(), "launch_rocket".into()];

        let warnings = config.validate(&ToolCatalog::standard()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("launch_rocket"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = FileConfig::default();
        config.permissions.confirmation_timeout_seconds = 0;

        let err = config.validate(&ToolCatalog::standard()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field.ends_with("timeout_seconds")));
    }

    #[test]
    fn test_unknown_tier_is_an_error() {
        let mut config = FileConfig::default();
        config.permissions.granted_tiers = vec!["god_mode".into()];

        assert!(config.to_preferences().is_err());
        assert!(config.validate(&ToolCatalog::standard()).is_err());
    }

    #[test]
    fn test_build_orchestrator() {
        let mut config = FileConfig::default();
        config.permissions.granted_tiers = vec!["full_access".into()];
        config.permissions.auto_approve = vec!["delete_task".into()];

        let orchestrator = config.build_orchestrator(Arc::new(ToolCatalog::standard())).unwrap();
        assert!(orchestrator.has_permission("delete_task"));
        assert!(!orchestrator.requires_confirmation("delete_task"));
    }
}
