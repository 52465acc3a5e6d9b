//! Output sink traits and types
//!
//! This module defines the trait interface crawl jobs write their results
//! through, and the error type shared by its implementations.

use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persistence of crawl results
///
/// A sink is shared by every job the runner executes, so implementations
/// must be thread-safe. Jobs for the same domain never call a sink
/// concurrently; the runner serializes them.
pub trait PageSink: Send + Sync {
    /// Stores the extracted text of one page
    ///
    /// # Arguments
    ///
    /// * `domain` - The job's domain, selecting the per-domain store
    /// * `url` - The fetched URL, hashed into the entry's key
    /// * `text` - Extracted plain text (may be empty)
    ///
    /// # Returns
    ///
    /// Where the page was written. Writing the same URL twice overwrites.
    fn write_page(&self, domain: &str, url: &str, text: &str) -> OutputResult<PathBuf>;

    /// Replaces the domain's external-link list
    ///
    /// # Arguments
    ///
    /// * `domain` - The job's domain
    /// * `links` - `scheme://netloc` origins seen outside the job's scope
    ///
    /// # Returns
    ///
    /// Where the list was written. An empty set yields an empty file.
    fn write_external_links(&self, domain: &str, links: &HashSet<String>)
        -> OutputResult<PathBuf>;
}
