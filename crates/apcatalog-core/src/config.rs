//! AP Catalog Configuration Module
//!
//! Provides configuration file support via `apcatalog.toml`, environment
//! variables, and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (CLI flags)
//! 2. Environment variables (`APCATALOG_*`, sections separated by `__`)
//! 3. Configuration file (`apcatalog.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "apcatalog.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Dataset configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the JSON dataset (array of records).
    pub dataset_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/machines.json".to_string(),
        }
    }
}

/// Table view configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page at session start.
    pub default_per_page: usize,
    /// Page sizes the user may pick from.
    pub page_sizes: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_per_page: 25,
            page_sizes: vec![10, 25, 50, 100],
        }
    }
}

/// Column preference persistence section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Persist column preferences between sessions.
    pub enabled: bool,
    /// Preference file path (empty = platform data directory).
    pub file: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: String::new(),
        }
    }
}

impl PreferencesConfig {
    /// Resolves the preference file location.
    ///
    /// Falls back to `<data_local_dir>/apcatalog/preferences.json`, or the
    /// working directory when the platform has no data directory.
    #[must_use]
    pub fn resolved_file(&self) -> PathBuf {
        if !self.file.is_empty() {
            return PathBuf::from(&self.file);
        }
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("apcatalog")
            .join("preferences.json")
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: text or compact.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Interactive browser configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplSettings {
    /// Show timing after each rendered view.
    pub timing: bool,
    /// Output format: table or json.
    pub format: String,
}

impl Default for ReplSettings {
    fn default() -> Self {
        Self {
            timing: false,
            format: "table".to_string(),
        }
    }
}

/// Main AP Catalog configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Dataset configuration.
    pub data: DataConfig,
    /// Table view configuration.
    pub table: TableConfig,
    /// Preference persistence configuration.
    pub preferences: PreferencesConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Interactive browser configuration.
    pub repl: ReplSettings,
}

impl CatalogConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(CONFIG_FILE_NAME)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error: defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("APCATALOG_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.dataset_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "data.dataset_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.table.page_sizes.is_empty() || self.table.page_sizes.contains(&0) {
            return Err(ConfigError::InvalidValue {
                key: "table.page_sizes".to_string(),
                message: format!(
                    "value {:?} must be a non-empty list of positive sizes",
                    self.table.page_sizes
                ),
            });
        }

        if !self.table.page_sizes.contains(&self.table.default_per_page) {
            return Err(ConfigError::InvalidValue {
                key: "table.default_per_page".to_string(),
                message: format!(
                    "value {} is not one of {:?}",
                    self.table.default_per_page, self.table.page_sizes
                ),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["text", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        let valid_outputs = ["table", "json"];
        if !valid_outputs.contains(&self.repl.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "repl.format".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.repl.format, valid_outputs
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}
