//! Where archive bytes come from.

use std::io::Read;

use crate::http::{HttpClient, HttpClientConfig, HttpError};

/// A source of archive streams addressed by URL.
///
/// `open` is always called from a blocking thread, never from the async runtime.
pub trait ArchiveSource: Send + Sync {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, HttpError>;
}

/// Fetches archives over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpArchiveSource {
    config: HttpClientConfig,
}

impl HttpArchiveSource {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, HttpError> {
        // The response keeps the client's connection alive after the
        // client handle itself is dropped.
        let client = HttpClient::with_config(self.config.clone())?;
        client.open(url)
    }
}
