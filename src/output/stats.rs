//! Per-job crawl statistics
//!
//! Counters are collected by the coordinator while a job runs and handed
//! back when it finishes.

use crate::state::{PageOutcome, StopReason};
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics for one job
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Number of URLs popped from the frontier and fetched
    pub pages_fetched: u64,

    /// Count of pages by outcome
    pub pages_by_outcome: HashMap<PageOutcome, u64>,

    /// Number of distinct URLs ever accepted into the frontier
    pub urls_seen: u64,

    /// URLs still queued when the job stopped
    pub urls_remaining: u64,

    /// Distinct external origins recorded
    pub external_links: u64,

    /// Why the job stopped
    pub stop_reason: StopReason,

    /// Wall-clock time the job ran for
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Records the outcome of one fetched page
    pub fn record(&mut self, outcome: PageOutcome) {
        self.pages_fetched += 1;
        *self.pages_by_outcome.entry(outcome).or_insert(0) += 1;
    }

    /// Number of pages with the given outcome
    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// Number of pages that produced an output file
    pub fn pages_written(&self) -> u64 {
        self.count(PageOutcome::Saved) + self.count(PageOutcome::Unsupported)
    }

    /// Number of pages that failed
    pub fn pages_failed(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        (self.pages_written() as f64 / self.pages_fetched as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `seed` - The job's seed URL
/// * `stats` - The statistics to display
pub fn print_statistics(seed: &str, stats: &CrawlStats) {
    println!("=== {} ===", seed);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  URLs seen: {}", stats.urls_seen);
    println!("  External origins: {}", stats.external_links);
    println!("  Stopped: {} after {:.1?}", stats.stop_reason, stats.elapsed);

    if stats.stop_reason.is_early() {
        println!("  Left in frontier: {}", stats.urls_remaining);
    }

    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    for (outcome, count) in outcome_counts {
        println!("  {}: {}", outcome, count);
    }

    println!(
        "  Success Rate: {:.1}% ({} / {} pages written)",
        stats.success_rate(),
        stats.pages_written(),
        stats.pages_fetched
    );
}
