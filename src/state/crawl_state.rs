use crate::crawler::{PageRecord, PageResults};
use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The key was new and one unit of budget is now reserved for it
    Admitted,

    /// The key was admitted earlier; no budget consumed
    Duplicate,

    /// The budget is used up; no budget consumed
    BudgetExhausted,
}

impl Admission {
    /// Returns the page state this admission outcome leads to
    pub fn state(&self) -> PageState {
        match self {
            Self::Admitted => PageState::Admitted,
            Self::Duplicate => PageState::Duplicate,
            Self::BudgetExhausted => PageState::BudgetExhausted,
        }
    }
}

/// Counters and timestamps summarising a crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// The configured page budget
    pub max_pages: usize,

    /// Number of URLs admitted (budget units consumed)
    pub admitted: usize,

    /// Number of URLs that reached each terminal state
    pub outcomes: HashMap<PageState, u64>,
}

impl CrawlStats {
    fn new(max_pages: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            max_pages,
            admitted: 0,
            outcomes: HashMap::new(),
        }
    }

    /// Returns how many URLs reached the given state
    pub fn count(&self, state: PageState) -> u64 {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// Returns the number of recorded pages
    pub fn recorded(&self) -> u64 {
        self.count(PageState::Recorded)
    }

    /// Returns the number of admitted URLs whose fetch failed
    pub fn failed(&self) -> u64 {
        self.count(PageState::Failed)
    }

    /// Returns the total number of rejected URLs
    pub fn rejected(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(state, _)| state.is_rejected())
            .map(|(_, count)| count)
            .sum()
    }

    /// Returns the crawl duration, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Mutable crawl state: the visited set, the results and the page budget
///
/// Every check-and-act on these fields happens in one method call, so callers
/// holding the lock never see a half-applied update.
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    pages: PageResults,
    stats: CrawlStats,
}

impl CrawlState {
    /// Creates an empty state with the given page budget
    pub fn new(max_pages: usize) -> Self {
        Self {
            visited: HashSet::new(),
            pages: PageResults::new(),
            stats: CrawlStats::new(max_pages),
        }
    }

    /// Checks the budget and the visited set, reserving a slot on success
    ///
    /// A duplicate never consumes budget. An admitted key keeps its slot even
    /// if the fetch later fails.
    pub fn try_admit(&mut self, key: &str) -> Admission {
        let admission = if self.visited.contains(key) {
            Admission::Duplicate
        } else if self.stats.admitted >= self.stats.max_pages {
            Admission::BudgetExhausted
        } else {
            self.stats.admitted += 1;
            self.visited.insert(key.to_string());
            Admission::Admitted
        };

        if admission != Admission::Admitted {
            self.note(admission.state());
        }

        admission
    }

    /// Stores a page record under its key
    ///
    /// Returns false, leaving the existing record untouched, if the key
    /// already has one.
    pub fn record(&mut self, key: &str, page: PageRecord) -> bool {
        debug_assert!(self.visited.contains(key), "recording unadmitted key {}", key);

        if self.pages.contains_key(key) {
            return false;
        }

        self.pages.insert(key.to_string(), page);
        self.note(PageState::Recorded);
        true
    }

    /// Counts a URL that reached a terminal state
    pub fn note(&mut self, state: PageState) {
        *self.stats.outcomes.entry(state).or_insert(0) += 1;
    }

    /// Returns the number of admitted URLs
    pub fn admitted(&self) -> usize {
        self.stats.admitted
    }

    /// Returns the recorded pages
    pub fn pages(&self) -> &PageResults {
        &self.pages
    }

    /// Returns the statistics so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}

/// Handle to crawl state shared by every branch of one crawl
#[derive(Debug, Clone)]
pub struct SharedCrawlState {
    inner: Arc<Mutex<CrawlState>>,
}

impl SharedCrawlState {
    /// Creates a fresh shared state with the given page budget
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CrawlState::new(max_pages))),
        }
    }

    /// Atomically checks and reserves budget for a key
    pub fn try_admit(&self, key: &str) -> Admission {
        self.lock().try_admit(key)
    }

    /// Stores a page record, never overwriting an existing one
    pub fn record(&self, key: &str, page: PageRecord) -> bool {
        self.lock().record(key, page)
    }

    /// Counts a URL that reached a terminal state
    pub fn note(&self, state: PageState) {
        self.lock().note(state);
    }

    /// Returns the number of admitted URLs
    pub fn admitted(&self) -> usize {
        self.lock().admitted()
    }

    /// Moves the results out and stamps the finish time
    pub fn finish(&self) -> (PageResults, CrawlStats) {
        let mut state = self.lock();
        state.stats.finished_at = Some(Utc::now());
        let pages = std::mem::take(&mut state.pages);
        (pages, state.stats.clone())
    }

    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        // Every mutation completes inside one method call
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> PageRecord {
        PageRecord {
            page_url: url.to_string(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_admit_new_key() {
        let mut state = CrawlState::new(3);
        assert_eq!(state.try_admit("a.test/x"), Admission::Admitted);
        assert_eq!(state.admitted(), 1);
    }

    #[test]
    fn test_duplicate_does_not_consume_budget() {
        let mut state = CrawlState::new(3);
        state.try_admit("a.test/x");
        assert_eq!(state.try_admit("a.test/x"), Admission::Duplicate);
        assert_eq!(state.try_admit("a.test/x"), Admission::Duplicate);
        assert_eq!(state.admitted(), 1);
        assert_eq!(state.stats().count(PageState::Duplicate), 2);
    }

    #[test]
    fn test_budget_exhausted() {
        let mut state = CrawlState::new(2);
        assert_eq!(state.try_admit("a"), Admission::Admitted);
        assert_eq!(state.try_admit("b"), Admission::Admitted);
        assert_eq!(state.try_admit("c"), Admission::BudgetExhausted);
        assert_eq!(state.admitted(), 2);
        assert_eq!(state.stats().count(PageState::BudgetExhausted), 1);
    }

    #[test]
    fn test_failed_admission_keeps_its_slot() {
        let mut state = CrawlState::new(1);
        assert_eq!(state.try_admit("a"), Admission::Admitted);
        state.note(PageState::Failed);

        // The slot is not handed back for another URL, nor for a retry
        assert_eq!(state.try_admit("b"), Admission::BudgetExhausted);
        assert_eq!(state.try_admit("a"), Admission::Duplicate);
        assert!(state.pages().is_empty());
    }

    #[test]
    fn test_record_never_overwrites() {
        let mut state = CrawlState::new(2);
        state.try_admit("a.test/x");

        assert!(state.record("a.test/x", page("https://a.test/x")));
        assert!(!state.record("a.test/x", page("https://a.test/x?second")));

        assert_eq!(state.pages().len(), 1);
        assert_eq!(state.pages()["a.test/x"].page_url, "https://a.test/x");
        assert_eq!(state.stats().recorded(), 1);
    }

    #[test]
    fn test_stats_rejected_sum() {
        let mut state = CrawlState::new(1);
        state.try_admit("a");
        state.try_admit("a");
        state.try_admit("b");
        state.note(PageState::OutOfScope);
        state.note(PageState::Failed);

        assert_eq!(state.stats().rejected(), 3);
        assert_eq!(state.stats().failed(), 1);
    }

    #[test]
    fn test_shared_state_finish() {
        let shared = SharedCrawlState::new(5);
        assert_eq!(shared.try_admit("a.test"), Admission::Admitted);
        assert!(shared.record("a.test", page("https://a.test")));

        let (pages, stats) = shared.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(stats.admitted, 1);
        assert!(stats.finished_at.is_some());
        assert!(stats.duration().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admission_respects_budget() {
        let shared = SharedCrawlState::new(10);
        let mut handles = Vec::new();

        for i in 0..100 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                // Every key is attempted by several tasks at once
                let key = format!("a.test/{}", i % 25);
                shared.try_admit(&key)
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() == Admission::Admitted {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
        assert_eq!(shared.admitted(), 10);
    }
}
