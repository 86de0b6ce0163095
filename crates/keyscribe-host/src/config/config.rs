//! Configuration management for the KeyScribe host.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        ChannelConfig, DEFAULT_DURATION_TICK_MS, DEFAULT_MAX_DURATION_SECS, DEFAULT_TIMEOUT_SECS,
        RecordingConfig, StoreConfig, TranscriptionConfig, default_endpoint,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use keyscribe_core::container_dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared store location.
    pub store: StoreConfig,
    /// Capture settings.
    pub recording: RecordingConfig,
    /// Action channel polling cadence.
    #[serde(default)]
    pub channel: ChannelConfig,
    /// Transcription service settings.
    pub transcription: TranscriptionConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    ///
    /// Note: The transcription endpoint is NOT contacted here. An unreachable
    /// service surfaces per session as a transcription failure, so the host
    /// can still record and report status.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let config = Self::load_from(&config_path)?;
            info!(config_path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Parse a configuration file.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Build the default configuration rooted at `data_dir`.
    pub fn defaults(store_dir: PathBuf, data_dir: &Path) -> Self {
        Config {
            store: StoreConfig { dir: store_dir },
            recording: RecordingConfig {
                dir: data_dir.join("recordings"),
                duration_tick_ms: DEFAULT_DURATION_TICK_MS,
                max_duration_secs: DEFAULT_MAX_DURATION_SECS,
                keep_recordings: false,
            },
            channel: ChannelConfig::default(),
            transcription: TranscriptionConfig {
                endpoint: default_endpoint(),
                api_key: None,
                prompt: None,
                user_id: String::new(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "keyscribe", "KeyScribe").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let config = Self::defaults(container_dir()?, proj_dirs.data_dir());

        config.save_to(&Self::config_path()?)?;

        warn!(
            endpoint = %config.transcription.endpoint,
            "Default config created. Set the transcription endpoint before recording."
        );

        Ok(config)
    }
}
