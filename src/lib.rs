//! Advisory-Harvest: a security-advisory crawler
//!
//! This crate walks a paginated advisory index, extracts every recent article,
//! enriches the CVE identifiers it mentions against a vulnerability database and
//! collects the article's discussion thread. The result is written as one JSON
//! record set.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Advisory-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Index page {page} unavailable: {source}")]
    IndexUnavailable { page: u32, source: FetchError },

    #[error("Unexpected page layout at {url}: {message}")]
    Shape { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl HarvestError {
    /// Builds a layout mismatch error for the given URL
    pub fn shape(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shape {
            url: url.into(),
            message: message.into(),
        }
    }
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport failures: the fetch did not produce a usable document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for Advisory-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ArticleRecord, IdentifierRecord};
pub use state::{ArticleOutcome, CrawlState, StopReason};
pub use crate::url::title_from_slug;
