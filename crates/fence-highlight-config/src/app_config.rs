//! Application configuration
//!
//! Configuration loaded from .fence-highlight.toml file.
//!
//! ```toml
//! standalone = true
//!
//! [highlight]
//! theme = { dark = "base16-ocean.dark", light = "InspiredGitHub" }
//! langs = ["rust", "toml"]
//! highlighted_classname = "marked"
//! diff_scan = "independent"
//! ```

use anyhow::{Context, Result};
use fence_highlight::HighlightOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration loaded from .fence-highlight.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Highlighter options (`[highlight]` table)
    #[serde(default)]
    pub highlight: HighlightOptions,

    /// Wrap rendered output in a complete HTML document
    #[serde(default)]
    pub standalone: bool,
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {:#}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicit path; unlike [`AppConfig::load`] a
    /// missing or invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        log::info!("Loaded app config from {}", path.display());
        Ok(config)
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
