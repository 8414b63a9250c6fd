//! Scrappy main entry point
//!
//! This is the command-line interface for the Scrappy site crawler.

use clap::Parser;
use scrappy::config::{load_config, validate, Config};
use scrappy::output::{print_statistics, write_csv_report};
use scrappy::Crawler;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Scrappy: a single-site web crawler
///
/// Scrappy crawls every page on the seed URL's host, respecting robots.txt,
/// and writes the title, first paragraph, links and images of each page to
/// a CSV report.
#[derive(Parser, Debug)]
#[command(name = "scrappy")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency single-site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of simultaneous fetches
    #[arg(value_name = "MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Maximum number of pages to visit
    #[arg(value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path of the CSV report (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    handle_crawl(&cli.url, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scrappy=info,warn"),
            1 => EnvFilter::new("scrappy=debug,info"),
            2 => EnvFilter::new("scrappy=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(max_concurrency) = cli.max_concurrency {
        config.crawler.max_concurrency = max_concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(output) = &cli.output {
        config.output.report_path = output.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(seed: &str, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let report_path = PathBuf::from(&config.output.report_path);

    println!("starting crawl of: {}", seed);

    let crawler = Crawler::new(config)?;
    let outcome = match crawler.run(seed).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    for page in outcome.pages.values() {
        println!(
            "Found {} outgoing links on {}",
            page.outgoing_links.len(),
            page.page_url
        );
    }

    write_report(&outcome.pages, &report_path)?;
    println!();
    print_statistics(&outcome.stats);

    Ok(())
}

fn write_report(
    pages: &scrappy::PageResults,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    write_csv_report(pages, path)?;
    println!("✓ Report written to: {}", path.display());
    Ok(())
}
