//! Configuration loading: TOML file with environment variable overrides.
//!
//! Reads `devmeta.toml` from the working directory unless another path is
//! given on the command line. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::Path;

use serde::Deserialize;

use devmeta_app::selection::ConfigurableScope;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalogue snapshot settings.
    pub catalogue: CatalogueConfig,
    /// Selection defaults.
    pub selection: SelectionConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Catalogue snapshot location.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Path of the JSON snapshot.
    pub path: String,
}

/// Defaults applied to selection queries.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Prefix of every generated path when the query sets none.
    pub path_prefix: String,
    /// Which sibling candidates count as configurables.
    pub configurable_scope: ScopeSetting,
}

/// Serialized form of [`ConfigurableScope`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeSetting {
    #[default]
    SameContent,
    SameService,
}

impl From<ScopeSetting> for ConfigurableScope {
    fn from(value: ScopeSetting) -> Self {
        match value {
            ScopeSetting::SameContent => Self::SameContent,
            ScopeSetting::SameService => Self::SameService,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DEVMETA_CATALOGUE") {
            self.catalogue.path = val;
        }
        if let Ok(val) = std::env::var("DEVMETA_PATH_PREFIX") {
            self.selection.path_prefix = val;
        }
        if let Ok(val) = std::env::var("DEVMETA_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalogue.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalogue path must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the configured sibling scope as the engine type.
    #[must_use]
    pub fn configurable_scope(&self) -> ConfigurableScope {
        self.selection.configurable_scope.into()
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            path: "catalogue.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "devmeta=info,devmeta_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.catalogue.path, "catalogue.json");
        assert_eq!(config.selection.path_prefix, "");
        assert_eq!(config.configurable_scope(), ConfigurableScope::SameContent);
        assert_eq!(config.logging.filter, "devmeta=info,devmeta_app=info");
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalogue.path, "catalogue.json");
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [catalogue]
            path = '/var/lib/devmeta/catalogue.json'

            [selection]
            path_prefix = 'inputs'
            configurable_scope = 'same_service'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalogue.path, "/var/lib/devmeta/catalogue.json");
        assert_eq!(config.selection.path_prefix, "inputs");
        assert_eq!(config.configurable_scope(), ConfigurableScope::SameService);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [selection]
            path_prefix = 'outputs'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.selection.path_prefix, "outputs");
        assert_eq!(config.selection.configurable_scope, ScopeSetting::SameContent);
        assert_eq!(config.catalogue.path, "catalogue.json");
    }

    #[test]
    fn should_reject_unknown_scope() {
        let toml = "
            [selection]
            configurable_scope = 'everywhere'
        ";
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.catalogue.path, "catalogue.json");
    }

    #[test]
    fn should_reject_blank_catalogue_path() {
        let mut config = Config::default();
        config.catalogue.path = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_accept_default_catalogue_path() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
