//! Application configuration.
//!
//! Settings are stored as YAML in `~/.staffdesk/config.yaml`. Everything has
//! a default, so a missing file means "all defaults" rather than an error.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name within the staffdesk home directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default seconds between autosave passes (the 5-minute timer).
const DEFAULT_AUTOSAVE_SECS: u64 = 300;

/// Default minutes of lookahead for event reminders.
const DEFAULT_REMINDER_LOOKAHEAD_MINUTES: i64 = 10;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Data directory override. `None` means the default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Seconds between autosave passes.
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,

    /// How far ahead of an event's start time a reminder fires, in minutes.
    #[serde(default = "default_reminder_lookahead_minutes")]
    pub reminder_lookahead_minutes: i64,

    /// When enabled, every repository mutation is appended to the
    /// operation log (see [`crate::oplog`]).
    #[serde(default)]
    pub debug_logging: bool,
}

const fn default_autosave_secs() -> u64 {
    DEFAULT_AUTOSAVE_SECS
}

const fn default_reminder_lookahead_minutes() -> i64 {
    DEFAULT_REMINDER_LOOKAHEAD_MINUTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_secs: DEFAULT_AUTOSAVE_SECS,
            reminder_lookahead_minutes: DEFAULT_REMINDER_LOOKAHEAD_MINUTES,
            debug_logging: false,
        }
    }
}

impl AppConfig {
    /// Load config from the default location, returning defaults if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        default_config_path().map_or_else(|| Ok(Self::default()), |path| Self::load_from(&path))
    }

    /// Load config from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a specific file path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The data directory this configuration selects.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::default_data_dir)
    }
}

/// Get the default config file path (`~/.staffdesk/config.yaml`).
///
/// Returns `None` if the home directory cannot be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".staffdesk").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.autosave_secs, 300);
        assert_eq!(config.reminder_lookahead_minutes, 10);
        assert!(!config.debug_logging);
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig {
            data_dir: Some(PathBuf::from("/srv/office")),
            autosave_secs: 60,
            reminder_lookahead_minutes: 15,
            debug_logging: true,
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "autosave_secs: 120\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.autosave_secs, 120);
        assert_eq!(config.reminder_lookahead_minutes, 10);
        assert!(!config.debug_logging);
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "autosave_secs: [not a number").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        AppConfig::default().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_resolved_data_dir_prefers_override() {
        let config =
            AppConfig { data_dir: Some(PathBuf::from("/srv/office")), ..AppConfig::default() };
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/srv/office"));
    }

    #[test]
    fn test_resolved_data_dir_default() {
        let config = AppConfig::default();
        assert_eq!(config.resolved_data_dir(), paths::default_data_dir());
    }
}
