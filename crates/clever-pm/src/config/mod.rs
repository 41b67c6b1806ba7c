//! Configuration for the resolution engine.
//!
//! # Configuration Sources (in priority order, highest to lowest)
//!
//! 1. Environment variables (`CLEVER_*`)
//! 2. Global `config.json` in `CLEVER_HOME` or the platform config directory
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use clever_pm::config::Config;
//!
//! let config = Config::build(true).unwrap();
//! println!("Installing {} packages at a time", config.max_concurrency);
//! ```

mod config;
mod source;

pub use config::Config;
pub use source::{ConfigLoader, ConfigSource, RawConfig};
