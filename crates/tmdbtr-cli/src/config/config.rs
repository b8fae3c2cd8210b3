//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Translation output settings.
    #[serde(default)]
    pub translations: TranslationsConfig,
}

/// TMDB access configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API read access token. `TMDB_API_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

/// Translation output configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TranslationsConfig {
    /// Default ISO 639-1 language filter when `--language` is omitted.
    #[serde(default)]
    pub languages: Vec<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
