//! Configuration for the keyboard extension.
//!
//! The extension only reads its configuration. A missing file means
//! defaults; nothing is written back.

use crate::{
    KeyboardError, KeyboardResult,
    config::{ChannelConfig, DisplayConfig, InsertionConfig, StoreConfig},
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shared store location.
    pub store: StoreConfig,
    /// Status line behavior.
    pub display: DisplayConfig,
    /// Status channel polling cadence.
    pub channel: ChannelConfig,
    /// Text insertion behavior.
    pub insertion: InsertionConfig,
}

impl Config {
    /// Load `path`, or the default location when `None`.
    ///
    /// An explicit path must exist. The default location falls back to
    /// built-in defaults when absent.
    #[track_caller]
    #[instrument]
    pub fn load(path: Option<&Path>) -> KeyboardResult<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }

        let Some(default_path) = Self::default_path() else {
            debug!("No project directories, using defaults");
            return Ok(Self::default());
        };

        if default_path.exists() {
            let config = Self::load_from(&default_path)?;
            info!(config_path = ?default_path, "Configuration loaded");
            Ok(config)
        } else {
            debug!(config_path = ?default_path, "No config found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse a configuration file.
    #[track_caller]
    pub fn load_from(path: &Path) -> KeyboardResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| KeyboardError::ConfigError {
            reason: format!("Failed to read config {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    #[track_caller]
    pub fn parse(contents: &str) -> KeyboardResult<Self> {
        toml::from_str(contents).map_err(|e| KeyboardError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "keyscribe", "KeyScribe")
            .map(|dirs| dirs.config_dir().join("keyboard.toml"))
    }
}
