use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CleverError, Result};

/// Represents the source of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default built-in value
    Default,
    /// From the global config.json
    Global,
    /// From environment variable
    Environment(String),
}

impl ConfigSource {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigSource::Default => "default",
            ConfigSource::Global => "global",
            ConfigSource::Environment(var) => var,
        }
    }
}

/// Raw configuration data as found in config.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Loads configuration from the global file and the environment
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
    home: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self {
            use_environment,
            home: None,
        }
    }

    /// Use `home` instead of `CLEVER_HOME` or the platform directory
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Get a CLEVER_* environment variable, ignoring empty values
    pub fn get_clever_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Get the clever home directory
    pub fn get_clever_home(&self) -> PathBuf {
        if let Some(home) = &self.home {
            return home.clone();
        }

        if let Some(home) = self.get_clever_env("CLEVER_HOME") {
            return PathBuf::from(home);
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "clever") {
            proj_dirs.config_dir().to_path_buf()
        } else if let Some(base) = directories::BaseDirs::new() {
            base.home_dir().join(".clever")
        } else {
            PathBuf::from(".clever")
        }
    }

    /// Load configuration from a JSON file; a missing file is empty config
    pub fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<RawConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(RawConfig::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CleverError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CleverError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load the global config.json from the clever home
    pub fn load_global_config(&self) -> Result<RawConfig> {
        self.load_config_file(self.get_clever_home().join("config.json"))
    }

    /// Converts "max-retries" to "CLEVER_MAX_RETRIES" and reads it
    pub fn get_env_config(&self, key: &str) -> Option<String> {
        self.get_clever_env(&Self::env_name(key))
    }

    pub fn env_name(key: &str) -> String {
        format!("CLEVER_{}", key.replace('-', "_").to_uppercase())
    }
}
