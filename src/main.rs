//! Vacancy Finder main entry point
//!
//! This is the command-line interface for searching job listings and
//! comparing their salaries.

use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use vacancy_finder::config::{load_config_with_hash, Config};
use vacancy_finder::crawler::{finder_from_config, pool_size, SearchEvent, SearchReport};
use vacancy_finder::output::{
    export_listings, export_statistics, format_salary, print_statistics, Statistics,
    StatsComparison,
};
use vacancy_finder::site::{HeadHunterAdapter, Listing, SiteAdapter};
use vacancy_finder::url::EncodedQuery;
use vacancy_finder::RunState;

/// Vacancy Finder: salary statistics from job search results
///
/// Each query is searched on the configured job site. Every result page is
/// fetched, listings with a salary are collected, and the salaries of all
/// queries are compared side by side.
#[derive(Parser, Debug)]
#[command(name = "vacancy-finder")]
#[command(version)]
#[command(about = "Salary statistics from job search results", long_about = None)]
struct Cli {
    /// Search phrases, one search per phrase
    #[arg(value_name = "QUERY", required = true)]
    queries: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Write every collected listing to this file
    #[arg(long, value_name = "PATH")]
    listings_csv: Option<PathBuf>,

    /// Write the statistics of every query to this file
    #[arg(long, value_name = "PATH")]
    stats_csv: Option<PathBuf>,

    /// Validate config and show the first page of each search without fetching
    #[arg(long, conflicts_with_all = ["listings_csv", "stats_csv"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.queries)
    } else {
        handle_search(&config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vacancy_finder=info,warn"),
            1 => EnvFilter::new("vacancy_finder=debug,info"),
            2 => EnvFilter::new("vacancy_finder=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config, queries: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Vacancy Finder Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Area: {}", config.site.area);
    println!("  Currency: {}", config.site.currency_code);
    println!("  Only with salary: {}", config.site.only_with_salary);

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_seconds);
    println!("  User agent: {}", config.fetcher.user_agent);

    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    println!("\nWorkers:");
    println!(
        "  Bounds: {}..={}",
        config.workers.min_workers, config.workers.max_workers
    );
    println!(
        "  Pool size on this machine: {}",
        pool_size(available, config.workers.min_workers, config.workers.max_workers)
    );

    let adapter = HeadHunterAdapter::new(&config.site)?;
    println!("\nQueries ({}):", queries.len());
    for query in queries {
        println!("  - {}", query.trim());
        println!("    * {}", adapter.result_url(&EncodedQuery::encode(query)));
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Runs one search, logging progress and stopping on Ctrl-C
async fn run_search(config: &Config, query: &str) -> Result<SearchReport, Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let finder = finder_from_config(config)?.with_progress(tx);

    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SearchEvent::Progress { processed, total } => {
                    tracing::info!("Processed {}/{} pages", processed, total)
                }
                SearchEvent::Finished { state } => tracing::debug!("Search {}", state),
            }
        }
    });

    let stop = finder.stop_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Stop requested, waiting for pages in flight");
            stop.stop();
        }
    });

    let report = finder.start(query).await;

    interrupt.abort();
    drop(finder);
    let _ = progress.await;

    Ok(report?)
}

fn status_line(query: &str, listings: &[Listing], stats: Option<&Statistics>) -> String {
    match stats {
        Some(stats) => format!(
            "{}: {} listings, average salary {}",
            query.trim(),
            listings.len(),
            format_salary(stats.average)
        ),
        None => format!("{}: no listings", query.trim()),
    }
}

/// Handles the main search operation
async fn handle_search(config: &Config, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Searching {} ({} queries)",
        config.site.base_url,
        cli.queries.len()
    );

    let mut comparison = StatsComparison::new();
    let mut all_listings = Vec::new();
    let mut failed = 0;

    for query in &cli.queries {
        let report = run_search(config, query).await?;

        match report.state {
            RunState::Failed => {
                failed += 1;
                match &report.error {
                    Some(e) => tracing::error!("Search for {:?} failed: {}", query, e),
                    None => tracing::error!("Search for {:?} failed", query),
                }
                continue;
            }
            RunState::Cancelled => {
                tracing::warn!(
                    "Search for {:?} stopped, {} pages skipped",
                    query,
                    report.skipped_pages
                );
            }
            _ => {}
        }

        let stats = if report.listings.is_empty() {
            None
        } else {
            Some(Statistics::compute(query, &report.listings)?)
        };
        println!("{}", status_line(query, &report.listings, stats.as_ref()));

        if let Some(stats) = stats {
            comparison.add(stats);
        }
        all_listings.extend(report.listings);

        if report.state == RunState::Cancelled {
            break;
        }
    }

    if !comparison.is_empty() {
        println!();
        print_statistics(&comparison);
    }

    if let Some(path) = &cli.listings_csv {
        export_listings(path, &all_listings)?;
        println!("✓ Listings exported to: {}", path.display());
    }
    if let Some(path) = &cli.stats_csv {
        export_statistics(path, comparison.as_slice())?;
        println!("✓ Statistics exported to: {}", path.display());
    }

    if failed > 0 {
        return Err(format!("{} of {} searches failed", failed, cli.queries.len()).into());
    }

    Ok(())
}
