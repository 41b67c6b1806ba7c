use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use clever_pm::{Location, ModuleType};

pub const CONFIG_FILE: &str = "clever.toml";

/// The project configuration file structure (clever.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CleverToml {
    /// Frontend seed: components described by bower.json
    pub frontend: Option<LocationConfig>,

    /// Backend seed: modules described by package.json
    pub backend: Option<LocationConfig>,

    /// Directory the file was loaded from; relative dirs resolve against it
    #[serde(skip)]
    pub root: PathBuf,
}

/// One install location
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// Seed root directory (`~` is expanded)
    pub dir: String,

    /// Module directory relative to `dir`
    pub path: String,
}

impl CleverToml {
    /// Load configuration from clever.toml, searching upward from the given directory
    pub fn load(start_dir: &Path) -> Result<Option<Self>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE);

            if config_path.exists() {
                let content = std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read {}", config_path.display()))?;
                let mut config: CleverToml = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?;
                config.root = current;
                return Ok(Some(config));
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Load configuration by searching upward from the current working directory
    pub fn load_from_cwd() -> Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        Self::load(&cwd)
    }

    /// The configured location for one domain
    pub fn location(&self, module_type: ModuleType) -> Result<Option<Location>> {
        let entry = match module_type {
            ModuleType::Frontend => &self.frontend,
            ModuleType::Backend => &self.backend,
        };

        entry
            .as_ref()
            .map(|entry| {
                let dir = shellexpand::full(&entry.dir)
                    .with_context(|| format!("Failed to expand {}", entry.dir))?;
                Ok(Location::new(
                    self.root.join(&*dir),
                    &entry.path,
                    module_type,
                ))
            })
            .transpose()
    }

    /// Every configured location, frontend first
    pub fn locations(&self) -> Result<Vec<Location>> {
        let mut locations = Vec::new();
        for module_type in [ModuleType::Frontend, ModuleType::Backend] {
            if let Some(location) = self.location(module_type)? {
                locations.push(location);
            }
        }
        Ok(locations)
    }
}
