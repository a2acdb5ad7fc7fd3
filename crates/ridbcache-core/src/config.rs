//! Application configuration management.
//!
//! Configuration is read from `<config dir>/ridbcache/config.json` when that
//! file exists, then overridden by environment variables:
//!
//! - `RIDB_API_KEY`: API key sent with every request (required)
//! - `RIDB_BASE_URL`: RIDB API root
//! - `RECGOV_BASE_URL`: root of the recreation.gov pages campsites link to
//! - `RIDB_TIMEOUT_SECS`: per-request timeout in seconds

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_BASE_URL;
use crate::cache::{PaginatedFetcher, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

/// Application name used for the config directory path
const APP_NAME: &str = "ridbcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Root of the public recreation.gov site
pub const DEFAULT_RECGOV_BASE_URL: &str = "https://www.recreation.gov";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "RIDB_API_KEY";
pub const ENV_BASE_URL: &str = "RIDB_BASE_URL";
pub const ENV_RECGOV_BASE_URL: &str = "RECGOV_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RIDB_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub recgov_base_url: String,
    pub request_timeout_secs: u64,
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            recgov_base_url: DEFAULT_RECGOV_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Ok(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Override fields from environment-style variables. Empty values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_RECGOV_BASE_URL) {
            self.recgov_base_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        Ok(())
    }

    /// The API key, or an error telling the user how to provide one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No RIDB API key configured; set {} or add api_key to {}",
                    ENV_API_KEY,
                    CONFIG_FILE
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// A fetcher using this configuration's paging and timeout settings.
    pub fn fetcher(&self) -> PaginatedFetcher {
        PaginatedFetcher::new(&self.recgov_base_url)
            .with_page_size(self.page_size)
            .with_max_pages(self.max_pages)
            .with_call_timeout(self.request_timeout())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
