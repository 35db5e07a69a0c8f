//! Pagesift main entry point
//!
//! Command-line interface for the pagesift crawler.

use clap::Parser;
use pagesift::config::load_config;
use pagesift::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagesift: a bounded, pattern-constrained web crawler
///
/// Pagesift starts from a seed URL, follows links that match a glob pattern,
/// stops after a configurable page budget, and writes the extracted pages to
/// a single JSON file.
#[derive(Parser, Debug)]
#[command(name = "pagesift")]
#[command(version)]
#[command(about = "A bounded, pattern-constrained web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match crawl(&config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed: {} pages attempted, {} records written",
                report.pages_attempted,
                report.records_extracted
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagesift=info,warn"),
            1 => EnvFilter::new("pagesift=debug,info"),
            2 => EnvFilter::new("pagesift=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &pagesift::CrawlConfig) {
    println!("=== Pagesift Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.url);
    println!("  Match pattern: {}", config.match_pattern);
    println!("  Page budget: {}", config.max_pages_to_crawl);
    println!("  Output file: {}", config.output_file_name);

    println!("\nTuning:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    println!(
        "  Politeness delay: {}ms per host",
        config.crawler.politeness_delay_ms
    );

    println!("\n✓ Configuration is valid");
}
