// src/config.rs
use crate::cli::Cli;
use crate::errors::ConfigError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub api_base_url: String,
    pub mount_point: String,
    pub cache_stale_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            mount_point: "root".to_string(),
            cache_stale_secs: 60,
            request_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl ShellConfig {
    /// Reads the config file if one is given, falling back to defaults for
    /// anything it leaves out.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        let config: ShellConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.api_url {
            self.api_base_url = url.clone();
        }
        if let Some(mount_point) = &cli.mount_point {
            self.mount_point = mount_point.clone();
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        self
    }

    pub fn api_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url).map_err(|source| ConfigError::InvalidUrl {
            value: self.api_base_url.clone(),
            source,
        })
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.cache_stale_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
