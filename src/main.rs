//! Advisory-Harvest main entry point
//!
//! This is the command-line interface for the advisory harvester.

use advisory_harvest::config::{load_config_with_hash, validate, Config};
use advisory_harvest::crawler::Coordinator;
use advisory_harvest::output::{print_summary, JsonFileStore, ResultStore};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Advisory-Harvest: a security-advisory crawler
///
/// Collects recent advisories from the index, enriches their CVE identifiers
/// from the vulnerability database, gathers reader comments and writes
/// everything to one JSON file.
#[derive(Parser, Debug)]
#[command(name = "advisory-harvest")]
#[command(version)]
#[command(about = "A security-advisory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the recency window in days
    #[arg(long, value_name = "DAYS")]
    days: Option<u32>,

    /// Override the results file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(days) = cli.days {
        config.crawler.recency_days = days;
    }
    if let Some(output) = &cli.output {
        config.output.results_path = output.display().to_string();
    }
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("advisory_harvest=info,warn"),
            1 => EnvFilter::new("advisory_harvest=debug,info"),
            2 => EnvFilter::new("advisory_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Advisory-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Recency window: {} days", config.crawler.recency_days);
    println!("  Max index pages: {}", config.crawler.max_pages);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Concurrent lookups per article: {}",
        config.crawler.max_concurrent_lookups
    );
    println!("  On index failure: {:?}", config.crawler.index_failure);

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Index: {}/seite-N", config.site.index_path);
    println!("  Forum: {}", config.site.forum_path);
    println!("  Excluded links ({}):", config.site.excluded_links.len());
    for link in &config.site.excluded_links {
        println!("    - {}", link);
    }

    println!("\nVulnerability database: {}", config.vuln_db.base_url);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.output.results_path);
    let coordinator = Coordinator::new(config).context("failed to build HTTP client")?;

    // Ctrl-C stops the crawl at the next article boundary; results so far are kept
    let interrupted = coordinator.interrupt_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current article");
            interrupted.store(true, Ordering::Relaxed);
        }
    });

    let outcome = match coordinator.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    store
        .write(&outcome.records)
        .with_context(|| format!("failed to write {}", store.destination()))?;
    tracing::info!(
        "Results of {} articles saved to {}",
        outcome.records.len(),
        store.destination()
    );

    print_summary(&outcome.summary);

    Ok(())
}
