// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Remote scraping backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Batch pacing settings
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Input/output/state file locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::config("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        if self.backend.api_url.trim().is_empty() {
            return Err(AppError::config("backend.api_url is empty"));
        }
        if self.pacing.batch_size == 0 {
            return Err(AppError::config("pacing.batch_size must be > 0"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            backend: BackendConfig::default(),
            pacing: PacingConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

/// HTTP client settings shared by backend and direct requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for direct (non-backend) requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds for direct page fetches
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Longer timeout for backend API requests
    #[serde(default = "defaults::backend_timeout")]
    pub backend_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            backend_timeout_secs: defaults::backend_timeout(),
        }
    }
}

/// Remote scraping backend (zone-based request API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Request API endpoint
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Zone for generic page fetches
    #[serde(default = "defaults::web_zone")]
    pub web_zone: String,

    /// Zone for search-engine queries
    #[serde(default = "defaults::serp_zone")]
    pub serp_zone: String,

    /// API token; usually left empty here and taken from the environment
    #[serde(default)]
    pub api_token: String,
}

impl BackendConfig {
    /// Environment variable consulted when `api_token` is empty.
    pub const TOKEN_ENV: &'static str = "BRIGHT_DATA_API_KEY";

    /// Effective API token: config value, else environment, else None.
    pub fn resolve_token(&self) -> Option<String> {
        if !self.api_token.trim().is_empty() {
            return Some(self.api_token.trim().to_string());
        }
        std::env::var(Self::TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            web_zone: defaults::web_zone(),
            serp_zone: defaults::serp_zone(),
            api_token: String::new(),
        }
    }
}

/// Pacing between fixed-size record batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Records processed between pauses
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Pause length in seconds after each batch
    #[serde(default = "defaults::batch_delay")]
    pub batch_delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            batch_delay_secs: defaults::batch_delay(),
        }
    }
}

/// File locations for input, output and durable progress state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Input CSV with company records
    #[serde(default = "defaults::input_csv")]
    pub input_csv: String,

    /// Directory for the dated export file
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,

    /// Durable progress state file
    #[serde(default = "defaults::progress_file")]
    pub progress_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_csv: defaults::input_csv(),
            output_dir: defaults::output_dir(),
            progress_file: defaults::progress_file(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn backend_timeout() -> u64 {
        60
    }

    // Backend defaults
    pub fn api_url() -> String {
        "https://api.brightdata.com/request".into()
    }
    pub fn web_zone() -> String {
        "mcp_unlocker".into()
    }
    pub fn serp_zone() -> String {
        "serp_api2_searchengine".into()
    }

    // Pacing defaults
    pub fn batch_size() -> usize {
        10
    }
    pub fn batch_delay() -> u64 {
        2
    }

    // Path defaults
    pub fn input_csv() -> String {
        "data/companies.csv".into()
    }
    pub fn output_dir() -> String {
        "data".into()
    }
    pub fn progress_file() -> String {
        "data/progress.json".into()
    }
}
