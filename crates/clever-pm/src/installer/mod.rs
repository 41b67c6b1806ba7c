//! Package installation system.
//!
//! This module fetches requested packages into their location's module
//! directory, normalizes frontend component names and installs the declared
//! dependencies of backend modules.

mod backend;
mod frontend;
mod fs;
mod manager;
mod npm;

pub use backend::BackendInstaller;
pub use frontend::FrontendInstaller;
pub use manager::InstallationManager;
pub use npm::{DependencyRunner, NpmRunner};

/// Default number of packages processed at the same time
pub const MAX_CONCURRENT_INSTALLS: usize = 8;

/// Run `tasks` with at most `limit` in flight and return the first error in
/// completion order. Every task runs to completion even after a failure.
pub(crate) async fn run_bounded<I, F>(tasks: I, limit: usize) -> crate::Result<()>
where
    I: IntoIterator<Item = F>,
    F: std::future::Future<Output = crate::Result<()>>,
{
    use futures_util::stream::{self, StreamExt};

    let results: Vec<_> = stream::iter(tasks)
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    results.into_iter().collect()
}
