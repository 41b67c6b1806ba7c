//! Backend installer - installs npm-style modules and their dependencies.

use std::sync::Arc;

use super::npm::DependencyRunner;
use super::run_bounded;
use crate::downloader::ArchiveFetcher;
use crate::manifest::{BackendManifestReader, ManifestReader};
use crate::package::{Location, Package};
use crate::Result;

/// Backend installer for npm modules
pub struct BackendInstaller {
    fetcher: Arc<ArchiveFetcher>,
    runner: Arc<dyn DependencyRunner>,
    max_concurrency: usize,
}

impl BackendInstaller {
    pub fn new(
        fetcher: Arc<ArchiveFetcher>,
        runner: Arc<dyn DependencyRunner>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            runner,
            max_concurrency,
        }
    }

    /// Fetch every package carrying a registry tarball straight into its
    /// module directory, then install the dependencies those packages declare.
    ///
    /// Packages without a tarball are left alone. The dependency cascade only
    /// starts once every fetch has succeeded.
    pub async fn install(&self, location: &Location, packages: &[Package]) -> Result<()> {
        let fetched: Vec<&Package> = packages
            .iter()
            .filter(|pkg| pkg.tarball().is_some())
            .collect();

        let fetches = fetched.iter().map(|pkg| async move {
            let name = pkg.base_name();
            self.fetcher
                .fetch(pkg, pkg.tarball(), &location.module_path_for(name))
                .await?;
            log::info!("Installed {}", name);
            Ok(())
        });
        run_bounded(fetches, self.max_concurrency).await?;

        self.cascade(location, &fetched).await
    }

    /// Install the dependencies and devDependencies declared by each
    /// package's package.json into the location's module directory.
    pub async fn install_dependencies(&self, location: &Location, packages: &[Package]) -> Result<()> {
        let packages: Vec<&Package> = packages.iter().collect();
        self.cascade(location, &packages).await
    }

    async fn cascade(&self, location: &Location, packages: &[&Package]) -> Result<()> {
        let installs = packages
            .iter()
            .map(|pkg| self.install_package_dependencies(location, pkg));
        run_bounded(installs, self.max_concurrency).await?;

        log::info!("Finished installing dependencies");
        Ok(())
    }

    // Specs of a single package run one after another so the number of
    // concurrent npm processes never exceeds the package concurrency.
    async fn install_package_dependencies(&self, location: &Location, package: &Package) -> Result<()> {
        let name = package.base_name();
        let package_dir = location.module_path_for(name);

        let manifest = match BackendManifestReader.read(&package_dir).await? {
            Some(manifest) => manifest,
            None => {
                log::debug!("No package.json in {}, nothing to install", package_dir.display());
                return Ok(());
            }
        };

        let specs = manifest.dependency_specs();
        if specs.is_empty() {
            return Ok(());
        }

        log::info!("Installing dependencies for {}", name);
        for spec in &specs {
            self.runner
                .install(name, spec, &location.module_dir, &package_dir)
                .await?;
        }

        Ok(())
    }
}
