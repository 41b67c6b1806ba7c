use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::source::{ConfigLoader, ConfigSource, RawConfig};
use crate::downloader::{GithubUrls, DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_URL};
use crate::error::{CleverError, Result};
use crate::http::{HttpClientConfig, DEFAULT_USER_AGENT};
use crate::installer::MAX_CONCURRENT_INSTALLS;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Packages fetched or cascaded at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Program used to install backend dependencies
    #[serde(default = "default_npm_command")]
    pub npm_command: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_github_url")]
    pub github_url: String,

    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

fn default_max_concurrency() -> usize {
    MAX_CONCURRENT_INSTALLS
}

fn default_npm_command() -> String {
    "npm".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    10
}

// Retrying is left to the caller unless configured
fn default_max_retries() -> u32 {
    0
}

fn default_github_url() -> String {
    DEFAULT_GITHUB_URL.to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_concurrency: default_max_concurrency(),
            npm_command: default_npm_command(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            max_retries: default_max_retries(),
            github_url: default_github_url(),
            github_api_url: default_github_api_url(),
            proxy: None,
            sources: HashMap::new(),
        }
    }
}

impl Config {
    const KEYS: [&'static str; 9] = [
        "max-concurrency",
        "npm-command",
        "user-agent",
        "timeout",
        "connect-timeout",
        "max-retries",
        "github-url",
        "github-api-url",
        "proxy",
    ];

    const NUMERIC_KEYS: [&'static str; 4] = ["max-concurrency", "timeout", "connect-timeout", "max-retries"];

    /// Build configuration from defaults, the global config.json and,
    /// when `use_environment` is set, `CLEVER_*` variables.
    pub fn build(use_environment: bool) -> Result<Self> {
        Self::build_with(&ConfigLoader::new(use_environment))
    }

    pub fn build_with(loader: &ConfigLoader) -> Result<Self> {
        let mut config = Self::default();

        for key in Self::KEYS {
            config.sources.insert(key.to_string(), ConfigSource::Default);
        }

        let global = loader.load_global_config()?;
        config.merge_raw_config(global, ConfigSource::Global)?;

        config.apply_env_overrides(loader)?;
        config.validate()?;

        log::debug!(
            "Loaded config from {} (max-concurrency {})",
            loader.get_clever_home().display(),
            config.max_concurrency
        );

        Ok(config)
    }

    /// Where a configuration value came from
    pub fn source(&self, key: &str) -> Option<&ConfigSource> {
        self.sources.get(key)
    }

    fn merge_raw_config(&mut self, raw: RawConfig, source: ConfigSource) -> Result<()> {
        if let Some(config_map) = raw.config {
            for (key, value) in config_map {
                self.merge_config_value(&key, &value, source.clone())?;
            }
        }
        Ok(())
    }

    fn merge_config_value(&mut self, key: &str, value: &serde_json::Value, source: ConfigSource) -> Result<()> {
        let invalid = || CleverError::Config(format!("Invalid value for {}: {}", key, value));

        match key {
            "max-concurrency" => {
                self.max_concurrency = value.as_u64().ok_or_else(invalid)? as usize;
            }
            "npm-command" => self.npm_command = value.as_str().ok_or_else(invalid)?.to_string(),
            "user-agent" => self.user_agent = value.as_str().ok_or_else(invalid)?.to_string(),
            "timeout" => self.timeout = value.as_u64().ok_or_else(invalid)?,
            "connect-timeout" => self.connect_timeout = value.as_u64().ok_or_else(invalid)?,
            "max-retries" => {
                self.max_retries = value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(invalid)?;
            }
            "github-url" => self.github_url = value.as_str().ok_or_else(invalid)?.to_string(),
            "github-api-url" => self.github_api_url = value.as_str().ok_or_else(invalid)?.to_string(),
            "proxy" => self.proxy = value.as_str().map(String::from),
            _ => {
                log::warn!("Ignoring unknown config key {}", key);
                return Ok(());
            }
        }

        self.sources.insert(key.to_string(), source);
        Ok(())
    }

    fn apply_env_overrides(&mut self, loader: &ConfigLoader) -> Result<()> {
        for key in Self::KEYS {
            let Some(raw) = loader.get_env_config(key) else {
                continue;
            };

            // Numeric settings arrive as strings from the environment
            let value = if Self::NUMERIC_KEYS.contains(&key) {
                raw.parse::<u64>().map(serde_json::Value::from).map_err(|_| {
                    CleverError::Config(format!("Invalid value for {}: {}", ConfigLoader::env_name(key), raw))
                })?
            } else {
                serde_json::Value::String(raw)
            };

            self.merge_config_value(
                key,
                &value,
                ConfigSource::Environment(ConfigLoader::env_name(key)),
            )?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(CleverError::Config("max-concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    /// HTTP client settings derived from this configuration
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut http = HttpClientConfig::new()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .with_max_retries(self.max_retries)
            .with_user_agent(self.user_agent.clone());

        if let Some(proxy) = &self.proxy {
            http = http.with_proxy(proxy.clone());
        }

        http
    }

    pub fn github_urls(&self) -> GithubUrls {
        GithubUrls {
            web: self.github_url.trim_end_matches('/').to_string(),
            api: self.github_api_url.trim_end_matches('/').to_string(),
        }
    }
}
