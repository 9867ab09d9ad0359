// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recorder configuration stored as TOML

use crate::{archiver::storage_error as storage, GameError, Result, DEFAULT_BOARD_SIZE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for recording and saving games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Directory new `.sgf` files are saved into
    pub save_dir: PathBuf,
    /// Board size for new games
    pub board_size: u8,
    /// Komi for new games
    pub komi: f32,
    /// Default log filter
    pub log_level: String,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "sgfgo", "sgfgo")
}

fn default_save_dir() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join("SGF_files"),
        None => PathBuf::from(".").join("SGF_files"),
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            board_size: DEFAULT_BOARD_SIZE,
            komi: 6.5,
            log_level: "info".to_string(),
        }
    }
}

/// Errors while reading or writing the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Storage(#[from] GameError),
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Default location of the configuration file
pub fn config_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from(".").join("sgfgo.toml"),
    }
}

/// Load the configuration at `path`, writing the defaults there first if
/// the file does not exist yet
pub fn load_config(path: &Path) -> std::result::Result<RecorderConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("Config file not found, creating default at: {}", path.display());
        let config = RecorderConfig::default();
        save_config(&config, path)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path).map_err(storage(path))?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write the configuration to `path`, creating parent directories
pub fn save_config(config: &RecorderConfig, path: &Path) -> std::result::Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(storage(parent))?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(storage(path))?;
    Ok(())
}

/// Check a board size from configuration
pub fn validate(config: &RecorderConfig) -> Result<()> {
    crate::meta::check_board_size(config.board_size)
}
