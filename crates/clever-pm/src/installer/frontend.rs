//! Frontend installer - installs bower-style components into a location.

use std::sync::Arc;

use super::fs::move_dir;
use super::run_bounded;
use crate::downloader::ArchiveFetcher;
use crate::manifest::{FrontendManifestReader, ManifestReader};
use crate::package::{Location, Package};
use crate::{CleverError, Result};

/// Frontend installer for bower components
pub struct FrontendInstaller {
    fetcher: Arc<ArchiveFetcher>,
    max_concurrency: usize,
}

impl FrontendInstaller {
    pub fn new(fetcher: Arc<ArchiveFetcher>, max_concurrency: usize) -> Self {
        Self {
            fetcher,
            max_concurrency,
        }
    }

    /// Fetch every package that carries a source `url`, then move each
    /// component to the directory its bower.json asks for.
    ///
    /// All fetches finish (or the batch fails) before any component is moved.
    pub async fn install(&self, location: &Location, packages: &[Package]) -> Result<()> {
        let fetches = packages
            .iter()
            .filter(|pkg| pkg.url.is_some())
            .map(|pkg| self.fetch_package(location, pkg));
        run_bounded(fetches, self.max_concurrency).await?;

        self.normalize(location, packages).await
    }

    async fn fetch_package(&self, location: &Location, package: &Package) -> Result<()> {
        let name = package.base_name();
        let staging = location.module_path_for(name);

        // Components come from their GitHub repository; a registry url that
        // names no GitHub owner is treated as a direct archive link.
        let explicit = match package.owner_or_from_url() {
            Some(_) => None,
            None => package.url.as_deref(),
        };

        self.fetcher.fetch(package, explicit, &staging).await?;
        log::info!("Installed {}", name);
        Ok(())
    }

    /// Apply bower.json `rename` directives to already staged components.
    pub async fn normalize(&self, location: &Location, packages: &[Package]) -> Result<()> {
        let renames = packages
            .iter()
            .map(|pkg| Self::normalize_package(location, pkg));
        run_bounded(renames, self.max_concurrency).await
    }

    async fn normalize_package(location: &Location, package: &Package) -> Result<()> {
        let name = package.base_name();
        log::info!("Checking bower.json file for instructions within {}", name);

        let staged = location.module_path_for(name);
        let manifest = match FrontendManifestReader.read(&staged).await? {
            Some(manifest) => manifest,
            None => return Ok(()),
        };

        let target = location.module_path_for(manifest.install_name(name));
        if target == staged || tokio::fs::try_exists(&target).await? {
            return Ok(());
        }

        move_dir(&staged, &target).await.map_err(|e| {
            CleverError::InstallationFailed(format!(
                "Failed to move {} to {}: {}",
                staged.display(),
                target.display(),
                e
            ))
        })?;

        log::info!("Finished renaming {}", name);
        Ok(())
    }
}
