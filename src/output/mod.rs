//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing per-page extracted text under a per-domain directory
//! - Writing the per-domain external-link list at job end
//! - Per-job crawl statistics

mod files;
pub mod stats;
mod traits;

pub use files::FileOutput;
pub use stats::{print_statistics, CrawlStats};
pub use traits::{OutputError, OutputResult, PageSink};
