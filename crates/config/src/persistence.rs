//! Configuration file reading and writing.
//!
//! This module owns raw file access for the configuration document. Parsing
//! and mutation live in [`crate::store`]; this layer only moves text between
//! memory and disk.
//!
//! # File Location
//!
//! The user configuration lives at `~/.config/ctw/config.toml` on every
//! platform. The `CTW_CONFIG` environment variable overrides it.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// User config directory, relative to the home directory.
const USER_CONFIG_DIR: &str = ".config/ctw";

/// User config file name.
const USER_CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the user configuration directory, `~/.config/ctw/`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|d| d.join(USER_CONFIG_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the default configuration file path, `~/.config/ctw/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use ctw_config::persistence::default_config_path;
///
/// let path = default_config_path().unwrap();
/// println!("Default config path: {}", path.display());
/// ```
pub fn default_config_path() -> Result<PathBuf> {
    Ok(user_config_dir()?.join(USER_CONFIG_FILE_NAME))
}

/// Reads a configuration file as text.
///
/// Returns `Ok(None)` when the file does not exist; a missing configuration
/// is not an error.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn read_config_text(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes configuration text to a file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_config_text(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    // Create parent directories if needed
    if let Some(parent) = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
