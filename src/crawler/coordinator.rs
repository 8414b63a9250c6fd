//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl from a seed URL to closure:
//! - Screening discovered links (normalization, domain scope, robots rules)
//! - Admitting URLs against the shared page budget
//! - Bounding in-flight fetches with a permit pool
//! - Recursively expanding each recorded page's outgoing links
//! - Joining every branch before the crawl completes

use crate::config::{validate, Config};
use crate::crawler::{extract_page_data, Fetcher, PageResults};
use crate::robots::{fetch_rules, DisallowRules};
use crate::state::{Admission, CrawlStats, PageState, SharedCrawlState};
use crate::url::{extract_domain, is_same_domain, normalize_url, parse_page_url};
use crate::{Result, ScrappyError};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

type Branch = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Result of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Recorded pages keyed by normalized URL
    pub pages: PageResults,

    /// Counters and timestamps for the crawl
    pub stats: CrawlStats,
}

/// Everything a crawl branch needs, shared by every branch of one crawl
struct CrawlContext {
    fetcher: Fetcher,
    domain: String,
    rules: DisallowRules,
    state: SharedCrawlState,
    permits: Semaphore,
    scheduled: Option<Mutex<HashSet<String>>>,
}

impl CrawlContext {
    /// Checks a discovered URL before it may be admitted
    ///
    /// Returns the normalized key, or None (with the rejection counted) if the
    /// URL is malformed, off-domain or disallowed by robots.txt.
    fn screen(&self, url: &str) -> Option<String> {
        let Some(key) = normalize_url(url) else {
            tracing::debug!("Dropping malformed URL: {}", url);
            self.state.note(PageState::Malformed);
            return None;
        };

        if !is_same_domain(url, &self.domain) {
            tracing::debug!("Skipping off-domain URL: {}", url);
            self.state.note(PageState::OutOfScope);
            return None;
        }

        if self.rules.is_disallowed(url) {
            tracing::info!("Skipping blocked URL: {}", url);
            self.state.note(PageState::RobotsDenied);
            return None;
        }

        Some(key)
    }

    /// Marks a key as scheduled, returning false if a branch was already spawned for it
    fn mark_scheduled(&self, key: &str) -> bool {
        let Some(scheduled) = &self.scheduled else {
            return true;
        };

        let mut scheduled = scheduled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        scheduled.insert(key.to_string())
    }

    /// Admits, fetches, extracts and records one URL
    ///
    /// Returns the page's outgoing links when it was recorded.
    async fn visit(&self, url: &str, key: &str) -> Option<Vec<String>> {
        match self.state.try_admit(key) {
            Admission::Admitted => tracing::trace!("Admitted {} ({})", url, key),
            Admission::Duplicate => {
                tracing::debug!("Already visited: {}", key);
                return None;
            }
            Admission::BudgetExhausted => {
                tracing::debug!("Page budget exhausted, not visiting {}", url);
                return None;
            }
        }

        let Ok(permit) = self.permits.acquire().await else {
            self.state.note(PageState::Failed);
            return None;
        };

        tracing::info!("Crawling {}", url);

        let body = match self.fetcher.fetch(url, "text/html").await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("{}", e);
                self.state.note(PageState::Failed);
                return None;
            }
        };

        let page = extract_page_data(&body, url);
        let links = page.outgoing_links.clone();

        if !self.state.record(key, page) {
            tracing::debug!("Record for {} already present", key);
        }

        drop(permit);
        Some(links)
    }
}

/// Crawls one URL and, recursively, every link it leads to
///
/// The returned future completes only once all spawned child branches have
/// completed.
fn crawl_branch(ctx: Arc<CrawlContext>, url: String, key: String) -> Branch {
    Box::pin(async move {
        let Some(links) = ctx.visit(&url, &key).await else {
            return;
        };

        let mut children = JoinSet::new();
        for link in links {
            let Some(child_key) = ctx.screen(&link) else {
                continue;
            };

            if !ctx.mark_scheduled(&child_key) {
                tracing::trace!("Already scheduled: {}", child_key);
                ctx.state.note(PageState::Duplicate);
                continue;
            }

            children.spawn(crawl_branch(Arc::clone(&ctx), link, child_key));
        }

        while let Some(joined) = children.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Crawl branch under {} ended abnormally: {}", url, e);
            }
        }
    })
}

/// Main crawler structure
///
/// A crawler can run any number of independent crawls; each run gets its own
/// visited set, budget and permit pool.
#[derive(Debug, Clone)]
pub struct Crawler {
    config: Config,
    fetcher: Fetcher,
}

impl Crawler {
    /// Creates a crawler from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(ScrappyError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;
        let fetcher = Fetcher::from_config(&config)?;
        Ok(Self { config, fetcher })
    }

    /// Crawls every reachable same-host page from a seed URL
    ///
    /// Per-page failures are logged and leave the page out of the results;
    /// only a seed URL that cannot be normalized fails the crawl.
    ///
    /// # Arguments
    ///
    /// * `seed` - The absolute URL to start from
    pub async fn run(&self, seed: &str) -> Result<CrawlOutcome> {
        let invalid_seed = || ScrappyError::InvalidSeed {
            url: seed.to_string(),
        };

        let seed_url = parse_page_url(seed).map_err(|e| {
            tracing::error!("{}", e);
            invalid_seed()
        })?;
        let domain = extract_domain(&seed_url).ok_or_else(invalid_seed)?;
        if normalize_url(seed).is_none() {
            return Err(invalid_seed());
        }

        let crawler = &self.config.crawler;
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} concurrent fetches)",
            seed,
            crawler.max_pages,
            crawler.max_concurrency
        );

        let rules = fetch_rules(&self.fetcher, seed).await;

        let ctx = Arc::new(CrawlContext {
            fetcher: self.fetcher.clone(),
            domain,
            rules,
            state: SharedCrawlState::new(crawler.max_pages),
            permits: Semaphore::new(crawler.max_concurrency),
            scheduled: crawler
                .dedupe_scheduling
                .then(|| Mutex::new(HashSet::new())),
        });

        match ctx.screen(seed) {
            Some(key) => {
                // The scheduled set is still empty, so the seed is always new
                let _ = ctx.mark_scheduled(&key);
                crawl_branch(Arc::clone(&ctx), seed.to_string(), key).await;
            }
            None => tracing::warn!("Seed URL {} is excluded from crawling", seed),
        }

        let (pages, stats) = ctx.state.finish();
        tracing::info!(
            "Crawl finished: {} pages recorded, {} failed, {} rejected",
            stats.recorded(),
            stats.failed(),
            stats.rejected()
        );

        Ok(CrawlOutcome { pages, stats })
    }
}
