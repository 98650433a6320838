//! Configuration directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/fence-highlight/`
//! - macOS: `~/Library/Application Support/fence-highlight/`
//! - Windows: `%APPDATA%\fence-highlight\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "fence-highlight";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the application config directory (not created)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the global config file
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(GLOBAL_CONFIG_FILE))
}
