//! Configuration file loader with multi-source merging

use super::file_config::{ConfigError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under the user's config dir.
const APP_DIR: &str = "toolgate";
const PROJECT_FILES: [&str; 2] = ["toolgate.toml", ".toolgate.toml"];
const ENV_PREFIX: &str = "TOOLGATE_";

/// Where a configuration layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: PathBuf,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `TOOLGATE_PERMISSIONS__CONFIRMATION_TIMEOUT_SECONDS=10`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolgate.toml` or `./.toolgate.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/toolgate/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::load_from(Self::figment(config_path))
    }

    /// Extract from a prepared figment. Tests use this to skip discovery.
    pub fn load_from(figment: Figment) -> Result<FileConfig, ConfigError> {
        Ok(figment.extract()?)
    }

    /// The merged provider chain used by [`load`](Self::load).
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path().filter(|p| p.exists()) {
            debug!(path = %global_path.display(), "Merging global config");
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!(path = %project_path.display(), "Merging project config");
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            debug!(path = %path.display(), "Merging explicit config");
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/toolgate/config.toml`, or the platform equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES.iter().map(PathBuf::from).find(|path| path.exists())
    }

    /// File sources in priority order, for diagnostics.
    pub fn config_sources() -> Vec<ConfigSource> {
        let mut sources = Vec::new();

        match Self::project_config_path() {
            Some(path) => sources.push(ConfigSource {
                label: "project",
                path,
                found: true,
            }),
            None => sources.push(ConfigSource {
                label: "project",
                path: PathBuf::from(PROJECT_FILES[0]),
                found: false,
            }),
        }

        if let Some(path) = Self::global_config_path() {
            let found = path.exists();
            sources.push(ConfigSource {
                label: "global",
                path,
                found,
            });
        }

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use toolgate_domain::PermissionTier;

    fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.permissions.confirmation_timeout_seconds, 30);
        assert!(config.permissions.auto_approve.is_empty());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("toolgate"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[permissions]\ngranted_tiers = [\"read_only\", \"modify_tasks\"]\nconfirmation_timeout_seconds = 5"
        )
        .unwrap();

        let config = ConfigLoader::load_from(defaults().merge(Toml::file(file.path()))).unwrap();

        assert_eq!(config.permissions.confirmation_timeout_seconds, 5);
        assert_eq!(
            config.permissions.granted_tiers().unwrap(),
            [PermissionTier::ReadOnly, PermissionTier::ModifyTasks].into()
        );
        // Untouched sections keep their defaults
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_later_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("config.toml");
        let project = dir.path().join("toolgate.toml");
        std::fs::write(&global, "[permissions]\nauto_approve = [\"start_timer\"]\nconfirmation_timeout_seconds = 60\n").unwrap();
        std::fs::write(&project, "[permissions]\nconfirmation_timeout_seconds = 15\n").unwrap();

        let figment = defaults().merge(Toml::file(&global)).merge(Toml::file(&project));
        let config = ConfigLoader::load_from(figment).unwrap();

        assert_eq!(config.permissions.confirmation_timeout_seconds, 15);
        assert_eq!(config.permissions.auto_approve, vec!["start_timer"]);
    }

    #[test]
    fn test_type_mismatch_is_extract_error() {
        let figment = defaults().merge(Toml::string("[permissions]\nconfirmation_timeout_seconds = \"soon\"\n"));
        let err = ConfigLoader::load_from(figment).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let figment = defaults().merge(Toml::file(dir.path().join("absent.toml")));
        assert!(ConfigLoader::load_from(figment).is_ok());
    }
}
