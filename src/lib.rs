//! Scrappy: a bounded-concurrency, single-domain web crawler
//!
//! This crate crawls every page reachable from a seed URL on the same host,
//! extracting a title, a summary paragraph, outgoing links and image URLs for
//! each page. The crawl respects robots.txt disallow rules, a page budget and
//! a cap on simultaneous in-flight fetches.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Scrappy operations
#[derive(Debug, Error)]
pub enum ScrappyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Seed URL cannot be crawled: {url}")]
    InvalidSeed { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Scrappy operations
pub type Result<T> = std::result::Result<T, ScrappyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlOutcome, Crawler, PageRecord, PageResults};
pub use state::{CrawlStats, PageState};
pub use url::{extract_domain, normalize_url};
