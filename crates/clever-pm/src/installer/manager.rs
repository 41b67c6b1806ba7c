//! Installation manager - wires configuration into the installers.

use std::sync::Arc;

use super::backend::BackendInstaller;
use super::frontend::FrontendInstaller;
use super::npm::{DependencyRunner, NpmRunner};
use crate::config::Config;
use crate::downloader::{ArchiveFetcher, ArchiveSource, HttpArchiveSource};
use crate::locator::{ModuleLocator, VersionCheck};
use crate::package::{Location, ModuleType, Package, ResolvedModule};
use crate::Result;

/// Installation manager
pub struct InstallationManager {
    fetcher: Arc<ArchiveFetcher>,
    frontend: FrontendInstaller,
    backend: BackendInstaller,
    config: Config,
}

impl InstallationManager {
    /// Create a manager that downloads over HTTP and installs dependencies
    /// with the configured npm command
    pub fn new(config: Config) -> Self {
        let source = Arc::new(HttpArchiveSource::new(config.to_http_config()));
        let runner = Arc::new(NpmRunner::new(config.npm_command.clone()));
        Self::with_components(config, source, runner)
    }

    /// Create a manager with a custom archive source and dependency runner
    pub fn with_components(
        config: Config,
        source: Arc<dyn ArchiveSource>,
        runner: Arc<dyn DependencyRunner>,
    ) -> Self {
        let fetcher = Arc::new(ArchiveFetcher::new(source).with_github_urls(config.github_urls()));
        let frontend = FrontendInstaller::new(fetcher.clone(), config.max_concurrency);
        let backend = BackendInstaller::new(fetcher.clone(), runner, config.max_concurrency);

        Self {
            fetcher,
            frontend,
            backend,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &ArchiveFetcher {
        &self.fetcher
    }

    /// Find an installed module across `locations`
    pub async fn locate(
        &self,
        locations: &[Location],
        name: &str,
        version: &str,
        check: VersionCheck,
    ) -> Result<Option<ResolvedModule>> {
        ModuleLocator::locate(locations, name, version, check).await
    }

    pub async fn install_frontend(&self, location: &Location, packages: &[Package]) -> Result<()> {
        log::debug!(
            "Installing {} frontend package(s) into {}",
            packages.len(),
            location.modules_root().display()
        );
        self.frontend.install(location, packages).await
    }

    pub async fn install_backend(&self, location: &Location, packages: &[Package]) -> Result<()> {
        log::debug!(
            "Installing {} backend package(s) into {}",
            packages.len(),
            location.modules_root().display()
        );
        self.backend.install(location, packages).await
    }

    /// Install into `location` with the installer matching its domain
    pub async fn install(&self, location: &Location, packages: &[Package]) -> Result<()> {
        match location.module_type {
            ModuleType::Frontend => self.install_frontend(location, packages).await,
            ModuleType::Backend => self.install_backend(location, packages).await,
        }
    }
}
