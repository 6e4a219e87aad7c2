//! Top-level application configuration.
//!
//! Configuration is stored in `.opsdesk/config.yaml` and includes:
//! - The API origin every request is sent to
//! - The invoice page size
//! - The per-request timeout

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{OpsError, Result};
use crate::types::OPSDESK_DIR;

/// Environment variable that overrides `api_url` from the config file
pub const API_URL_ENV: &str = "OPSDESK_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the operations API, e.g. `https://ops.example.com/api`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Number of invoices requested per page (default: 20)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_page_size() -> usize {
    20
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: default_page_size(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        PathBuf::from(OPSDESK_DIR).join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(OpsError::Config("page_size must be at least 1".to_string()));
        }
        if self.request_timeout == 0 {
            return Err(OpsError::Config(
                "request_timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the API origin, environment variable first.
    pub fn api_url(&self) -> Result<Url> {
        let raw = match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.api_url.clone().ok_or_else(|| {
                OpsError::Config(format!(
                    "API URL not configured. Set {API_URL_ENV} or run: opsdesk config set api_url <url>"
                ))
            })?,
        };

        parse_api_url(&raw)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                parse_api_url(value)?;
                self.api_url = Some(value.trim().to_string());
            }
            "page_size" => {
                self.page_size = value
                    .parse()
                    .map_err(|_| OpsError::InvalidNumber(value.to_string()))?;
            }
            "request_timeout" => {
                self.request_timeout = value
                    .parse()
                    .map_err(|_| OpsError::InvalidNumber(value.to_string()))?;
            }
            _ => return Err(unknown_key(key)),
        }
        self.validate()
    }

    /// Get a configuration value by key, as display text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self
                .api_url
                .clone()
                .unwrap_or_else(|| "not configured".to_string())),
            "page_size" => Ok(self.page_size.to_string()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            _ => Err(unknown_key(key)),
        }
    }
}

pub const VALID_CONFIG_KEYS: &[&str] = &["api_url", "page_size", "request_timeout"];

fn unknown_key(key: &str) -> OpsError {
    OpsError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_CONFIG_KEYS.join(", ")
    ))
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(OpsError::Config(format!(
            "unsupported API URL scheme '{other}', expected http or https"
        ))),
    }
}
