//! Path resolution for neoclean
//!
//! # Environment Variables
//!
//! - `NEOCLEAN_CONFIG` - Config file to load (also settable with `--config`)
//! - `NEOCLEAN_CONFIG_DIR` - Override the directory holding `config.txt`
//!
//! # Resolution Priority
//!
//! For config_dir():
//! 1. `NEOCLEAN_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/neoclean` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\neoclean`
//!    - macOS: `~/Library/Application Support/neoclean`
//!    - Linux: `~/.config/neoclean`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "NEOCLEAN_CONFIG_DIR";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.txt";

/// Get the neoclean config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("neoclean");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let base = dirs::config_dir().context("Could not determine config directory")?;
    let path = base.join("neoclean");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Resolve the config file: an explicit path wins over the config directory.
pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(&path.to_string_lossy())),
        None => Ok(config_dir()?.join(CONFIG_FILE_NAME)),
    }
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
