//! Configuration module for uabrowse
//!
//! Persistent defaults for the CLI: server endpoint, browse depth, export
//! directory and output verbosity. Stored as TOML in the user's config
//! directory; every field has a sane default so a missing file is never an
//! error.

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const fn default_depth() -> u32 {
    3
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UabrowseConfig {
    /// Endpoint used when the CLI gives none
    #[serde(default)]
    pub default_server_url: Option<String>,

    /// Browse depth used when the CLI gives none
    #[serde(default = "default_depth")]
    pub default_depth: u32,

    /// Directory for generated export artifacts
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for UabrowseConfig {
    fn default() -> Self {
        Self {
            default_server_url: None,
            default_depth: default_depth(),
            export_dir: None,
            quiet: false,
        }
    }
}

impl UabrowseConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("uabrowse").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UabrowseConfig::default();
        assert!(config.default_server_url.is_none());
        assert_eq!(config.default_depth, 3);
        assert!(config.export_dir.is_none());
        assert!(!config.quiet);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = UabrowseConfig {
            default_server_url: Some("demo".to_string()),
            default_depth: 7,
            export_dir: Some(PathBuf::from("/tmp/exports")),
            quiet: true,
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: UabrowseConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.default_server_url.as_deref(), Some("demo"));
        assert_eq!(parsed.default_depth, 7);
        assert_eq!(parsed.export_dir, Some(PathBuf::from("/tmp/exports")));
        assert!(parsed.quiet);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: UabrowseConfig = toml::from_str("quiet = true\n").unwrap();
        assert!(parsed.quiet);
        assert_eq!(parsed.default_depth, 3);
        assert!(parsed.default_server_url.is_none());
    }
}
