use std::path::PathBuf;

use thiserror::Error;

use crate::http::HttpError;
use crate::package::ModuleType;

#[derive(Error, Debug)]
pub enum CleverError {
    // Configuration errors: the request cannot be satisfied as asked
    #[error("{module}'s version is already {} than {requested} (currently at version {installed})", comparison_word(.greater))]
    VersionConflict {
        module: String,
        requested: String,
        installed: String,
        greater: bool,
    },

    #[error("{module} is already at version {version}")]
    AlreadyAtVersion { module: String, version: String },

    #[error("{module} is a {found} module, please install from your project's {} directory.", install_root(.found))]
    DomainMismatch {
        module: String,
        found: ModuleType,
        location: ModuleType,
    },

    #[error("Invalid version: {0}")]
    InvalidVersion(#[from] clever_semver::VersionError),

    // Package errors
    #[error("Cannot derive a source URL for {package}: no owner and no url given")]
    MissingOwner { package: String },

    #[error("Invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    // Manifest errors
    #[error("Failed to parse {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // Network errors
    #[error("Download failed for {package}: {source}")]
    DownloadFailed {
        package: String,
        #[source]
        source: HttpError,
    },

    #[error("Failed to extract {package}: {reason}")]
    ExtractionFailed { package: String, reason: String },

    // Dependency cascade errors; `stderr` holds the captured output verbatim
    #[error("Failed to install {dependency} for {package}: {stderr}")]
    DependencyInstall {
        package: String,
        dependency: String,
        stderr: String,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Installation failed: {0}")]
    InstallationFailed(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CleverError {
    /// Fatal errors describe a request that can never succeed as issued
    /// (version conflicts, duplicates, wrong install location). Everything
    /// else is an I/O failure the caller may choose to retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CleverError::VersionConflict { .. }
                | CleverError::AlreadyAtVersion { .. }
                | CleverError::DomainMismatch { .. }
                | CleverError::InvalidVersion(_)
        )
    }
}

fn comparison_word(greater: &bool) -> &'static str {
    if *greater {
        "greater"
    } else {
        "lesser"
    }
}

fn install_root(module_type: &ModuleType) -> &'static str {
    match module_type {
        ModuleType::Backend => "root",
        ModuleType::Frontend => "frontend",
    }
}

pub type Result<T> = std::result::Result<T, CleverError>;
