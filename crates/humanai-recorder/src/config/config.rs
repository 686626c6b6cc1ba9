//! Configuration management for humanai-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        CaptureConfig, EncoderConfig, MAX_REFRESH_RATE_HZ, OutputConfig, RecorderConfig,
        RenderConfig,
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
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Recorder behaviour.
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// Synthetic capture devices.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Render loop.
    #[serde(default)]
    pub render: RenderConfig,
    /// ffmpeg encoder.
    #[serde(default)]
    pub encoder: EncoderConfig,
    /// Downloads.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
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
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Parse and validate the configuration file at `path`.
    #[track_caller]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Reject values the recorder cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let refresh = self.render.refresh_rate_hz;
        if refresh == 0 || refresh > MAX_REFRESH_RATE_HZ {
            return Err(AppError::ConfigError {
                reason: format!(
                    "render.refresh_rate_hz must be between 1 and {}, got {}",
                    MAX_REFRESH_RATE_HZ, refresh
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let capture = &self.capture;
        for (name, width, height) in [
            ("display", capture.display_width, capture.display_height),
            ("webcam", capture.webcam_width, capture.webcam_height),
        ] {
            // Raw RGBA into libvpx needs even dimensions.
            if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
                return Err(AppError::ConfigError {
                    reason: format!(
                        "capture {} resolution must be non-zero and even, got {}x{}",
                        name, width, height
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        if self.recorder.finalize_timeout_ms == 0 {
            return Err(AppError::ConfigError {
                reason: "recorder.finalize_timeout_ms must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Save configuration to disk using atomic write pattern.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Write to a temporary file first, then rename over `path` so a crash
    /// mid-write never leaves a truncated config.
    #[track_caller]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

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

    /// Project directories shared by config, logs and fallback downloads.
    #[track_caller]
    pub fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "humanai", "HumanAI-Recorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
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
}
