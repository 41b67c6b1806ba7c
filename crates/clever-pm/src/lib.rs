//! Module resolution and installation engine.
//!
//! Modules live in install [`Location`]s, each belonging to one domain:
//! frontend components described by `bower.json` or backend modules described
//! by `package.json`. The engine locates installed modules, fetches release
//! archives and installs declared dependencies.

pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod installer;
pub mod locator;
pub mod manifest;
pub mod package;

pub use config::Config;
pub use downloader::{ArchiveFetcher, ArchiveSource, GithubUrls};
pub use error::{CleverError, Result};
pub use installer::{BackendInstaller, DependencyRunner, FrontendInstaller, InstallationManager};
pub use locator::{ModuleLocator, VersionCheck};
pub use package::{Location, ModuleType, Package, ResolvedModule};
