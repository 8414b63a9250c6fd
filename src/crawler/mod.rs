//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with status and content-type checks
//! - HTML content extraction
//! - Crawl coordination (admission, concurrency limiting, recursive expansion)

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::{CrawlOutcome, Crawler};
pub use extractor::{
    extract_page_data, get_first_paragraph_from_html, get_h1_from_html, get_images_from_html,
    get_urls_from_html, PageRecord, PageResults,
};
pub use fetcher::{build_http_client, FetchError, Fetcher};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl with default settings
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the seed site's robots.txt
/// 3. Crawl same-host pages until the closure or the budget is reached
///
/// # Arguments
///
/// * `seed` - The URL to start from
/// * `max_concurrency` - Maximum simultaneous fetches (at least 1)
/// * `max_pages` - Page budget (at least 1)
///
/// # Returns
///
/// * `Ok(PageResults)` - Recorded pages keyed by normalized URL
/// * `Err(ScrappyError)` - Invalid arguments or an uncrawlable seed
pub async fn run_crawl(seed: &str, max_concurrency: usize, max_pages: usize) -> Result<PageResults> {
    let mut config = Config::default();
    config.crawler.max_concurrency = max_concurrency;
    config.crawler.max_pages = max_pages;

    let outcome = Crawler::new(config)?.run(seed).await?;
    Ok(outcome.pages)
}
