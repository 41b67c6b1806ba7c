//! HTTP client for archive downloads.
//!
//! This module provides a wrapper around the blocking `reqwest` client with:
//! - Opt-in retries with exponential backoff (off unless `max_retries` is set)
//! - A product User-Agent header (GitHub rejects requests without one)
//! - Timeout and proxy handling
//!
//! The response body is handed out as a reader so archives can be streamed
//! straight into the decompressor without being buffered.
//!
//! The blocking client runs its own reactor, so an `HttpClient` must be created,
//! used and dropped off the async runtime, e.g. inside
//! `tokio::task::spawn_blocking`.
//!
//! # Examples
//!
//! ```no_run
//! use clever_pm::http::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig::new()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_max_retries(5);
//!
//! let client = HttpClient::with_config(config)?;
//! let body = client.open("https://api.github.com/repos/cleverstack/clever-orm/tarball/master")?;
//! # drop(body);
//! # Ok(())
//! # }
//! ```

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::io::Read;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "cleverstack";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 0;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Max retries exceeded for {url}")]
    MaxRetries { url: String },
}

pub struct HttpClient {
    client: Client,
    user_agent: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    /// Perform GET request with automatic retries
    pub fn get(&self, url: &str) -> Result<Response, HttpError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.client.get(url).send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        // Retry on server errors and rate limits
                        last_error = Some(HttpError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    } else {
                        // Don't retry on client errors (4xx except 429)
                        return Err(HttpError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                    }
                }
                Err(e) => {
                    log::debug!("GET {} failed (attempt {}): {}", url, attempt + 1, e);
                    last_error = Some(HttpError::Request(e));
                }
            }

            if attempt < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, 8s, etc.
                let delay = self.retry_delay * 2_u32.pow(attempt);
                std::thread::sleep(delay);
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Err(HttpError::MaxRetries {
                url: url.to_string(),
            }),
        }
    }

    /// GET a URL and return its body as a stream
    pub fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, HttpError> {
        log::debug!("Downloading {}", url);
        let response = self.get(url)?;
        Ok(Box::new(response))
    }

    /// Get the configured user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the maximum number of retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_config_builder() {
        let config = HttpClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_max_retries(5)
            .with_user_agent("Test/1.0".to_string());

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.user_agent, "Test/1.0");
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_default_user_agent() {
        let config = HttpClientConfig::default();
        assert_eq!(config.user_agent, "cleverstack");

        let client = HttpClient::with_config(config).unwrap();
        assert_eq!(client.user_agent(), "cleverstack");
        assert_eq!(client.max_retries(), 0);
    }

    /// Serve `500` to every request and count the requests
    fn failing_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/archive.tar.gz", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
            }
        });

        (url, hits)
    }

    #[test]
    fn test_single_request_by_default() {
        let (url, hits) = failing_server();
        let client = HttpClient::with_config(
            HttpClientConfig::default().with_retry_delay(Duration::from_millis(5)),
        )
        .unwrap();

        let err = client.get(&url).unwrap_err();

        assert!(matches!(err, HttpError::HttpStatus { status: 500, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_retries_are_opt_in() {
        let (url, hits) = failing_server();
        let client = HttpClient::with_config(
            HttpClientConfig::default()
                .with_max_retries(2)
                .with_retry_delay(Duration::from_millis(5)),
        )
        .unwrap();

        assert!(client.get(&url).is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    #[ignore] // Requires network access
    fn test_open_github_tarball() {
        let client = HttpClient::new().unwrap();
        let mut body = client
            .open("https://api.github.com/repos/rust-lang/rustlings/tarball/main")
            .unwrap();
        let mut magic = [0u8; 2];
        body.read_exact(&mut magic).unwrap();
        assert_eq!(magic, [0x1f, 0x8b]);
    }
}
