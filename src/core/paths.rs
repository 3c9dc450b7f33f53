// src/core/paths.rs

//! Where settings live and how user-written paths are expanded.

use crate::constants::{CONFIG_DIR_NAME, SETTINGS_FILENAME};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while locating or expanding paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// A `~` or `$VAR` in a path could not be expanded.
    #[error("Failed to expand path template '{template}': {reason}")]
    Expansion {
        /// The path as written.
        template: String,
        /// Why expansion failed.
        reason: String,
    },
}

/// Returns the pipeforge configuration directory (`~/.config/pipeforge` on Linux).
/// It is not created; pipeforge only ever reads from it.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the path of the default settings file.
pub fn default_settings_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path template.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// A clean, platform-canonical rendering of a path for messages.
pub fn display_path(path: &Path) -> String {
    dunce::simplified(path).display().to_string()
}
