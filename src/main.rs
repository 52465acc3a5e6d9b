//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest website ingester.

use anyhow::Context;
use clap::Parser;
use site_harvest::config::{apply_overrides, load_config_with_hash, Config};
use site_harvest::output::{print_statistics, FileOutput};
use site_harvest::runner::JobRunner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a domain-scoped website ingester
///
/// Crawls every page and document under each seed URL's domain and path,
/// writes the extracted text to one file per page, and records the origins
/// of links that point elsewhere.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version)]
#[command(about = "A domain-scoped website ingester", long_about = None)]
struct Cli {
    /// Seed URLs, one crawl job each
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the output data directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let config = apply_overrides(config, cli.data_dir).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.urls);
        return Ok(());
    }

    handle_crawl(config, &cli.urls).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_harvest=info,warn"),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config, urls: &[String]) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Frontier order: {:?}", config.crawler.frontier_order);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages per job: {}", max),
        None => println!("  Max pages per job: unbounded"),
    }
    match config.crawler.job_deadline {
        Some(secs) => println!("  Job deadline: {}s", secs),
        None => println!("  Job deadline: none"),
    }
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nOutput:");
    println!("  Data directory: {}", config.output.data_dir);

    println!("\nSeeds ({}):", urls.len());
    for url in urls {
        match site_harvest::url::CrawlJob::from_seed(url) {
            Ok(job) => println!("  - {} (domain: {}, base path: {})", url, job.domain, job.base_path),
            Err(e) => println!("  - {} (invalid: {})", url, e),
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, urls: &[String]) -> anyhow::Result<()> {
    let sink = Arc::new(FileOutput::new(&config.output.data_dir));
    tracing::info!("Writing output under {}", sink.data_dir().display());
    let runner = Arc::new(JobRunner::new(config, sink).context("Failed to start job runner")?);

    for url in urls {
        if let Err(e) = runner.submit(url) {
            tracing::error!("Rejected crawl request '{}': {}", url, e);
        }
    }

    tracing::info!("{} crawl jobs submitted", runner.pending_jobs());

    let signal_runner = runner.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_runner.shutdown();
        }
    });

    let reports = runner.wait().await;
    signal_task.abort();

    println!();
    for report in &reports {
        match (&report.stats, &report.error) {
            (Some(stats), _) => print_statistics(&report.seed, stats),
            (None, Some(error)) => println!("=== {} ===\n  Failed: {}", report.seed, error),
            (None, None) => println!("=== {} ===\n  Did not run", report.seed),
        }
    }

    Ok(())
}
