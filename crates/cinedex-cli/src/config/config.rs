//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cinedex_core::BrowseOptions;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB catalog settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Account backend settings.
    #[serde(default)]
    pub account: AccountConfig,
    /// Interactive browser settings.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// TMDB catalog configuration. The API token comes from `TMDB_API_TOKEN`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// Response language (e.g. "en-US", "ja-JP").
    #[serde(default = "default_language")]
    pub language: String,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            base_url: None,
        }
    }
}

/// Account backend configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountConfig {
    /// Base URL of the account API, ending in `/`.
    #[serde(default = "default_account_base_url")]
    pub base_url: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            base_url: default_account_base_url(),
        }
    }
}

/// Interactive browser configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Milliseconds between the last keystroke and the search it triggers.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Page numbers shown in the pagination window.
    #[serde(default = "default_page_window")]
    pub page_window: u32,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_window: default_page_window(),
        }
    }
}

impl BrowseConfig {
    /// Browser options for these settings.
    #[must_use]
    pub const fn options(&self) -> BrowseOptions {
        BrowseOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            max_visible: self.page_window,
        }
    }
}

fn default_language() -> String {
    String::from("en-US")
}

fn default_account_base_url() -> String {
    String::from(cinedex_api::account::DEFAULT_BASE_URL)
}

const fn default_debounce_ms() -> u64 {
    500
}

const fn default_page_window() -> u32 {
    5
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
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
