//! Lock prompt configuration
//!
//! Read from `$XDG_CONFIG_HOME/screenlock/config.json` unless a path is given.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use screenlock_core::{MessageKey, ScreenLockViewConfiguration};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "screenlock";

/// Log file name under the cache directory
const LOG_FILE_NAME: &str = "screenlock.log";

/// Lock prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Name shown in messages that refer to the app
    #[serde(default = "default_app_display_name")]
    pub app_display_name: String,

    /// Argon2 PHC hash of the device passcode
    #[serde(default)]
    pub passcode_hash: Option<String>,

    /// Force screen reader announcements on
    #[serde(default)]
    pub screen_reader: bool,

    /// Replacement text for individual messages
    #[serde(default)]
    pub strings: HashMap<MessageKey, String>,

    /// Colors, background and icon
    #[serde(default)]
    pub view: ScreenLockViewConfiguration,

    /// Where to write logs
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_app_display_name() -> String {
    "Screenlock".to_string()
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            app_display_name: default_app_display_name(),
            passcode_hash: None,
            screen_reader: false,
            strings: HashMap::new(),
            view: ScreenLockViewConfiguration::default(),
            log_file: None,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if there is no config file. A file that
    /// exists but can't be read or parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_if_present(Self::config_file_path().as_deref())
    }

    /// Load `path` when it exists, defaults otherwise
    pub fn load_if_present(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Log file location, falling back to the cache directory
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|d| d.join(CONFIG_DIR_NAME).join(LOG_FILE_NAME))
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
