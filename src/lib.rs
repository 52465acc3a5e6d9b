//! Site-Harvest: a domain-scoped website ingester
//!
//! This crate crawls every in-scope page and document reachable from a seed URL,
//! extracts plain text from HTML, PDF and DOCX resources, records the origins of
//! out-of-scope links, and writes the results to a per-domain directory tree.

pub mod config;
pub mod crawler;
pub mod output;
pub mod runner;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Missing URL in crawl request")]
    MissingUrl,
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Failure to turn one fetched resource into text
///
/// These never escape a crawl job: the coordinator logs them and moves on
/// to the next frontier entry.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Could not parse document at {url}: {reason}")]
    FormatParse { url: String, reason: String },

    #[error("Unexpected error for {url}: {reason}")]
    Unexpected { url: String, reason: String },
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlLimits};
pub use output::{CrawlStats, FileOutput, PageSink};
pub use runner::{JobReport, JobRunner};
pub use state::PageOutcome;
pub use url::{classify_link, url_hash, CrawlJob, LinkClass};
