//! Package downloading and extraction module.
//!
//! Archives are streamed from their source through gzip decompression and tar
//! extraction in one pass, then promoted into the module directory.

pub(crate) mod archive;
pub(crate) mod fetcher;
mod source;

pub use archive::ArchiveExtractor;
pub use fetcher::{ArchiveFetcher, GithubUrls, DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_URL};
pub use source::{ArchiveSource, HttpArchiveSource};
