//! Job runner: executes crawl jobs on a bounded worker pool
//!
//! `submit` returns as soon as the job is spawned. Each job owns its own
//! frontier, visited set, and external-link set; the only things jobs share
//! are the HTTP client, the output sink, and the per-domain locks.

mod domain_lock;

pub use domain_lock::{DomainGuard, DomainLocks};

use crate::config::Config;
use crate::crawler::{build_http_client, Coordinator, CrawlLimits};
use crate::output::{CrawlStats, PageSink};
use crate::url::CrawlJob;
use crate::{HarvestError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// What happened to one submitted seed
#[derive(Debug, Clone)]
pub struct JobReport {
    /// The seed as submitted
    pub seed: String,

    /// The job's domain, if the seed could be parsed
    pub domain: Option<String>,

    /// When the job was accepted
    pub submitted_at: DateTime<Utc>,

    /// When the job finished
    pub finished_at: DateTime<Utc>,

    /// Crawl counters, if the job ran
    pub stats: Option<CrawlStats>,

    /// Why the job could not run at all
    pub error: Option<String>,
}

impl JobReport {
    /// Returns true if the traversal ran (pages may still have failed)
    pub fn ran(&self) -> bool {
        self.stats.is_some()
    }
}

struct Shared {
    config: Config,
    client: Client,
    sink: Arc<dyn PageSink>,
    workers: Arc<Semaphore>,
    domain_locks: DomainLocks,
    cancel: Arc<AtomicBool>,
}

/// Accepts crawl requests and runs them concurrently
pub struct JobRunner {
    shared: Arc<Shared>,
    tasks: Mutex<JoinSet<JobReport>>,
}

impl JobRunner {
    /// Creates a runner with `config.crawler.workers` worker slots
    ///
    /// # Returns
    ///
    /// * `Ok(JobRunner)` - Ready to accept jobs
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config, sink: Arc<dyn PageSink>) -> Result<Self> {
        let client = build_http_client(&config.crawler)?;
        let workers = Arc::new(Semaphore::new(config.crawler.workers as usize));

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                client,
                sink,
                workers,
                domain_locks: DomainLocks::new(),
                cancel: Arc::new(AtomicBool::new(false)),
            }),
            tasks: Mutex::new(JoinSet::new()),
        })
    }

    /// Queues a crawl of `url` and returns immediately
    ///
    /// The URL is only checked for presence here. A malformed URL is
    /// reported through its `JobReport` once the job runs.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, url: &str) -> Result<()> {
        let seed = url.trim();
        if seed.is_empty() {
            return Err(HarvestError::MissingUrl);
        }

        let shared = self.shared.clone();
        let seed = seed.to_string();
        let submitted_at = Utc::now();
        tracing::info!("Crawling started for {}", seed);

        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(run_job(shared, seed, submitted_at));

        Ok(())
    }

    /// Number of submitted jobs that have not been collected by `wait`
    pub fn pending_jobs(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Asks every running and waiting job to stop
    ///
    /// Running jobs stop popping their frontier and write their external-link
    /// file; jobs that have not started yet finish without fetching anything.
    pub fn shutdown(&self) {
        tracing::info!("Shutdown requested, stopping all crawl jobs");
        self.shared.cancel.store(true, Ordering::Release);
    }

    /// Waits for every job submitted so far and returns their reports
    pub async fn wait(&self) -> Vec<JobReport> {
        let mut tasks = std::mem::take(
            &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let mut reports = Vec::with_capacity(tasks.len());

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!("Crawl job aborted: {}", e),
            }
        }

        reports
    }
}

async fn run_job(shared: Arc<Shared>, seed: String, submitted_at: DateTime<Utc>) -> JobReport {
    let job = match CrawlJob::from_seed(&seed) {
        Ok(job) => job,
        Err(e) => {
            tracing::error!("Cannot crawl {}: {}", seed, e);
            return JobReport {
                seed,
                domain: None,
                submitted_at,
                finished_at: Utc::now(),
                stats: None,
                error: Some(e.to_string()),
            };
        }
    };
    let domain = job.domain.clone();

    // Domain first, so a job waiting on its domain holds no worker slot
    let _domain_guard = shared.domain_locks.acquire(&domain).await;
    let _permit = match shared.workers.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            tracing::error!("Cannot crawl {}: {}", seed, e);
            return JobReport {
                seed,
                domain: Some(domain),
                submitted_at,
                finished_at: Utc::now(),
                stats: None,
                error: Some(e.to_string()),
            };
        }
    };

    let limits = CrawlLimits::from_config(&shared.config.crawler).with_cancel(shared.cancel.clone());
    let coordinator = Coordinator::new(
        job,
        shared.client.clone(),
        shared.sink.clone(),
        shared.config.crawler.frontier_order,
        limits,
    );
    let stats = coordinator.run().await;

    JobReport {
        seed,
        domain: Some(domain),
        submitted_at,
        finished_at: Utc::now(),
        stats: Some(stats),
        error: None,
    }
}
