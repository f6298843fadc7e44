//! Picscout: a breadth-first image discovery crawler
//!
//! This crate crawls a list of domains breadth-first under per-domain page
//! budgets and a link-depth bound, collecting every reachable image
//! reference into a deduplicated result set while streaming progress events.

pub mod config;
pub mod crawler;
pub mod event;
pub mod jobs;
pub mod render;
pub mod results;
pub mod urls;

use thiserror::Error;

/// Main error type for picscout operations
///
/// Only pre-dispatch failures surface here; once domains are dispatched,
/// every failure is locally recovered and reported as a warn event.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain in config: {0}")]
    InvalidDomain(String),
}

/// Result type alias for picscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{start, CrawlSummary};
pub use event::{CrawlEvent, EventLog, EventSink};
pub use jobs::{JobRegistry, JobStatus};
pub use results::ResultSink;
