//! Crawler coordinator - the traversal loop for one crawl job
//!
//! This module contains the main crawl loop, which:
//! - Owns the job's frontier, visited set, and external-link set
//! - Fetches and extracts one URL at a time, strictly sequentially
//! - Persists extracted text and refills the frontier from discovered links
//! - Contains every page-level failure, so a job always runs to completion
//! - Writes the external-link file when the loop ends, however it ends

use crate::config::{CrawlerConfig, FrontierOrder};
use crate::crawler::extract::extract_document;
use crate::crawler::frontier::Frontier;
use crate::output::{CrawlStats, PageSink};
use crate::state::{PageOutcome, StopReason};
use crate::url::{classify_links, CrawlJob};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Optional bounds on a crawl job
///
/// With the defaults a job runs until its frontier is empty. Any bound that
/// trips makes the loop stop popping and go straight to the final flush.
#[derive(Debug, Clone, Default)]
pub struct CrawlLimits {
    /// Stop after this many fetched pages
    pub max_pages: Option<u64>,

    /// Stop once the job has run this long
    pub deadline: Option<Duration>,

    /// Stop as soon as this flag is set
    pub cancel: Arc<AtomicBool>,
}

impl CrawlLimits {
    /// Builds limits from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            deadline: config.job_deadline.map(Duration::from_secs),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the cancellation flag with a shared one
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    fn check(&self, pages_fetched: u64, started: Instant) -> Option<StopReason> {
        if self.cancel.load(Ordering::Acquire) {
            return Some(StopReason::Cancelled);
        }
        if self.max_pages.is_some_and(|max| pages_fetched >= max) {
            return Some(StopReason::PageLimit);
        }
        if self.deadline.is_some_and(|deadline| started.elapsed() >= deadline) {
            return Some(StopReason::Deadline);
        }
        None
    }
}

/// Runs one crawl job from its seed to completion
pub struct Coordinator {
    job: CrawlJob,
    client: Client,
    sink: Arc<dyn PageSink>,
    frontier: Frontier,
    external_links: HashSet<String>,
    limits: CrawlLimits,
}

impl Coordinator {
    /// Creates a coordinator with a frontier holding only the seed
    ///
    /// # Arguments
    ///
    /// * `job` - Scope derived from the seed URL
    /// * `client` - HTTP client carrying the identification header
    /// * `sink` - Where page text and external links are written
    /// * `order` - Frontier pop order
    /// * `limits` - Optional page cap, deadline, and cancellation flag
    pub fn new(
        job: CrawlJob,
        client: Client,
        sink: Arc<dyn PageSink>,
        order: FrontierOrder,
        limits: CrawlLimits,
    ) -> Self {
        let mut frontier = Frontier::new(job.seed_url.clone(), order);
        frontier.mark_seen(job.seed_key());

        Self {
            job,
            client,
            sink,
            frontier,
            external_links: HashSet::new(),
            limits,
        }
    }

    /// Runs the crawl loop
    ///
    /// This never fails: fetch, parse, and write errors are logged per page
    /// and the loop moves on. The external-link file is always written, even
    /// when it is empty or every page failed.
    ///
    /// # Returns
    ///
    /// Counters describing what happened, for logging and reporting
    pub async fn run(mut self) -> CrawlStats {
        let started = Instant::now();
        let mut stats = CrawlStats::default();

        tracing::info!(
            "Starting crawl of {} (domain: {}, base path: {})",
            self.job.seed_url,
            self.job.domain,
            self.job.base_path
        );

        let stop_reason = loop {
            if let Some(reason) = self.limits.check(stats.pages_fetched, started) {
                tracing::info!(
                    "Stopping crawl of {} early: {} ({} URLs left)",
                    self.job.domain,
                    reason,
                    self.frontier.pending_len()
                );
                break reason;
            }

            let Some(url) = self.frontier.pop() else {
                break StopReason::FrontierExhausted;
            };

            tracing::info!("{}", url);
            let outcome = self.process_url(&url).await;
            stats.record(outcome);

            if stats.pages_fetched % 10 == 0 {
                tracing::debug!(
                    "Progress for {}: {} pages fetched, {} in frontier",
                    self.job.domain,
                    stats.pages_fetched,
                    self.frontier.pending_len()
                );
            }
        };

        self.flush_external_links();

        stats.urls_seen = self.frontier.accepted_len() as u64;
        stats.urls_remaining = self.frontier.pending_len() as u64;
        stats.external_links = self.external_links.len() as u64;
        stats.stop_reason = stop_reason;
        stats.elapsed = started.elapsed();

        tracing::info!(
            "Crawl of {} finished: {} pages fetched, {} written, {} failed in {:?}",
            self.job.domain,
            stats.pages_fetched,
            stats.pages_written(),
            stats.pages_failed(),
            stats.elapsed
        );

        stats
    }

    /// Fetches, extracts, and persists one URL, then follows its links
    async fn process_url(&mut self, url: &str) -> PageOutcome {
        let document = match extract_document(&self.client, url).await {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Failed to process {}. Reason: {}", url, e);
                return PageOutcome::from_error(&e);
            }
        };

        let mut outcome = if document.is_unsupported() {
            PageOutcome::Unsupported
        } else {
            PageOutcome::Saved
        };

        if let Err(e) = self.sink.write_page(&self.job.domain, url, &document.text) {
            tracing::warn!("Failed to write text for {}. Reason: {}", url, e);
            outcome = PageOutcome::Failed;
        }

        self.handle_discovered_links(&document.links);

        outcome
    }

    /// Classifies a page's links into the frontier and the external set
    fn handle_discovered_links(&mut self, links: &[String]) {
        let classified = classify_links(links.iter().map(String::as_str), &self.job);

        for link in classified.in_scope {
            if self.frontier.push(link.clone()) {
                tracing::debug!("Queued {}", link);
            }
        }

        self.external_links.extend(classified.external);
    }

    fn flush_external_links(&self) {
        match self
            .sink
            .write_external_links(&self.job.domain, &self.external_links)
        {
            Ok(path) => tracing::info!(
                "Wrote {} external links for {} to {}",
                self.external_links.len(),
                self.job.domain,
                path.display()
            ),
            Err(e) => tracing::error!(
                "Failed to write external links for {}: {}",
                self.job.domain,
                e
            ),
        }
    }
}
