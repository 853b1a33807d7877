//! Configuration file parsing for the daemon.
//!
//! Loads the database location, log level and janitor settings from TOML.

use lookout_janitor::JanitorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Daemon configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Parsed, but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Daemon configuration loaded from TOML
///
/// ```toml
/// database_path = "/var/lib/lookout/lookout.db"
/// log_level = "info"
///
/// [janitor]
/// base_period_secs = 86400
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// SQLite database holding samples, index and state
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Log filter used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Retention sweep settings
    #[serde(default)]
    pub janitor: JanitorConfig,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("lookout.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            janitor: JanitorConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the janitor would refuse to start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }
        self.janitor
            .policy()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}
