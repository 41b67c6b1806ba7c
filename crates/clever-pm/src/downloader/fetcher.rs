//! Archive fetcher: resolve a package's tarball URL, stream it into place.

use std::path::Path;
use std::sync::Arc;

use url::Url;

use super::archive::ArchiveExtractor;
use super::source::ArchiveSource;
use crate::package::Package;
use crate::{CleverError, Result};

pub const DEFAULT_GITHUB_URL: &str = "https://github.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Base URLs used to derive GitHub archive locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubUrls {
    /// Web host serving `/{owner}/{name}/archive/{ref}.tar.gz`
    pub web: String,
    /// API host serving `/repos/{owner}/{name}/tarball/{branch}`
    pub api: String,
}

impl Default for GithubUrls {
    fn default() -> Self {
        Self {
            web: DEFAULT_GITHUB_URL.to_string(),
            api: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }
}

/// Downloads package tarballs and extracts them into module directories
pub struct ArchiveFetcher {
    source: Arc<dyn ArchiveSource>,
    github: GithubUrls,
}

impl ArchiveFetcher {
    pub fn new(source: Arc<dyn ArchiveSource>) -> Self {
        Self {
            source,
            github: GithubUrls::default(),
        }
    }

    pub fn with_github_urls(mut self, github: GithubUrls) -> Self {
        self.github = github;
        self
    }

    /// Work out where a package's archive is downloaded from.
    ///
    /// A name pinned to a ref (`foo@v2.0.0`) always maps to the GitHub
    /// archive of that ref when the owner is known. Otherwise the explicit
    /// URL is used as is, falling back to the default branch tarball.
    pub fn resolve_url(&self, package: &Package, explicit: Option<&str>) -> Result<String> {
        let owner = package.owner_or_from_url();

        if let (Some(reference), Some(owner)) = (package.pinned_ref(), owner.as_deref()) {
            return Ok(format!(
                "{}/{}/{}/archive/{}.tar.gz",
                self.github.web.trim_end_matches('/'),
                owner,
                package.base_name(),
                reference
            ));
        }

        if let Some(url) = explicit {
            Url::parse(url).map_err(|e| CleverError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(url.to_string());
        }

        let owner = owner.ok_or_else(|| CleverError::MissingOwner {
            package: package.name.clone(),
        })?;

        Ok(format!(
            "{}/repos/{}/{}/tarball/master",
            self.github.api.trim_end_matches('/'),
            owner,
            package.base_name()
        ))
    }

    /// Fetch a package archive and extract it into `dest`.
    ///
    /// The archive is unpacked into a temporary sibling of `dest` with its
    /// top-level folder stripped, and only renamed onto `dest` once
    /// extraction finished. A failed fetch leaves `dest` untouched.
    pub async fn fetch(&self, package: &Package, explicit_url: Option<&str>, dest: &Path) -> Result<()> {
        let url = self.resolve_url(package, explicit_url)?;
        log::debug!("Fetching {} from {} into {}", package.name, url, dest.display());

        let parent = dest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tokio::fs::create_dir_all(&parent).await?;

        let source = self.source.clone();
        let dest = dest.to_path_buf();
        let name = package.base_name().to_string();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let staging = tempfile::Builder::new()
                .prefix(".clever-")
                .tempdir_in(&parent)?;

            let reader = source
                .open(&url)
                .map_err(|source| CleverError::DownloadFailed {
                    package: name.clone(),
                    source,
                })?;

            ArchiveExtractor::extract_tar_gz(reader, staging.path(), 1).map_err(|e| {
                CleverError::ExtractionFailed {
                    package: name.clone(),
                    reason: e.to_string(),
                }
            })?;

            promote(staging.path(), &dest, &parent)?;
            Ok(())
        })
        .await
        .map_err(|e| CleverError::InstallationFailed(format!("Fetch task failed: {}", e)))?
    }
}

/// Move `staging` onto `dest`. An existing `dest` is set aside first and put
/// back if the move fails, so `dest` is either the new tree or the old one.
fn promote(staging: &Path, dest: &Path, parent: &Path) -> std::io::Result<()> {
    if !dest.exists() {
        return std::fs::rename(staging, dest);
    }

    // Dropped at the end, taking the previous install with it
    let retired = tempfile::Builder::new()
        .prefix(".clever-old-")
        .tempdir_in(parent)?;
    let previous = retired.path().join("previous");
    std::fs::rename(dest, &previous)?;

    if let Err(e) = std::fs::rename(staging, dest) {
        log::debug!("Promoting {} failed ({}), restoring previous install", dest.display(), e);
        std::fs::rename(&previous, dest)?;
        return Err(e);
    }

    Ok(())
}
