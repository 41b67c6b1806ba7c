//! HTTP access to registries and GitHub.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError, DEFAULT_USER_AGENT};
