//! Robots.txt handling module
//!
//! This module fetches the seed site's robots.txt once per crawl and turns it
//! into a list of disallowed path prefixes. The policy is best effort: any
//! failure to fetch it leaves the crawl unrestricted.

mod parser;

pub use parser::DisallowRules;

use crate::crawler::Fetcher;

/// Builds the robots.txt URL for a base URL
///
/// Exactly one slash separates the base URL from `robots.txt`.
///
/// # Example
///
/// ```
/// use scrappy::robots::robots_url;
///
/// assert_eq!(robots_url("https://a.test"), "https://a.test/robots.txt");
/// assert_eq!(robots_url("https://a.test/"), "https://a.test/robots.txt");
/// ```
pub fn robots_url(base_url: &str) -> String {
    format!("{}/robots.txt", base_url.trim_end_matches('/'))
}

/// Fetches and parses robots.txt for a base URL
///
/// # Arguments
///
/// * `fetcher` - The fetcher used for the whole crawl
/// * `base_url` - The seed URL
///
/// # Returns
///
/// The disallow rules, or an empty rule set when the file could not be
/// fetched (network error, non-2xx status, or a non `text/plain` body)
pub async fn fetch_rules(fetcher: &Fetcher, base_url: &str) -> DisallowRules {
    let url = robots_url(base_url);

    match fetcher.fetch(&url, "text/plain").await {
        Ok(content) => {
            let rules = DisallowRules::from_content(&content);
            tracing::debug!("Loaded {} disallow rules from {}", rules.len(), url);
            rules
        }
        Err(e) => {
            tracing::warn!("Failed to fetch robots.txt: {}", e);
            DisallowRules::allow_all()
        }
    }
}
