//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the fixed identification header
//! - HTML, PDF and DOCX text extraction
//! - The per-job frontier and visited set
//! - The traversal loop for one crawl job

mod coordinator;
mod extract;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlLimits};
pub use extract::{
    extract_document, parse_docx, parse_pdf, DocumentError, ExtractedDocument, FormatKind,
};
pub use fetcher::{build_http_client, fetch_bytes, fetch_url, is_html_content_type, FetchResult};
pub use frontier::Frontier;
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::output::{CrawlStats, PageSink};
use crate::url::CrawlJob;
use crate::Result;
use std::sync::Arc;

/// Runs a complete crawl job for one seed URL
///
/// This is the single-job entry point. It will:
/// 1. Derive the job scope from the seed
/// 2. Build the HTTP client
/// 3. Traverse every reachable in-scope URL
/// 4. Write page text and the external-link list through `sink`
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The absolute URL to start from
/// * `sink` - Where results are written
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The job ran; individual pages may still have failed
/// * `Err(HarvestError)` - The seed could not be parsed or the client could not be built
pub async fn crawl(
    config: &Config,
    seed: &str,
    sink: Arc<dyn PageSink>,
) -> Result<CrawlStats> {
    let job = CrawlJob::from_seed(seed)?;
    let client = build_http_client(&config.crawler)?;
    let limits = CrawlLimits::from_config(&config.crawler);

    let coordinator = Coordinator::new(job, client, sink, config.crawler.frontier_order, limits);
    Ok(coordinator.run().await)
}
