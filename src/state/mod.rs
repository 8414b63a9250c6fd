//! State module for tracking crawl progress
//!
//! This module provides the state shared by every branch of a crawl.
//!
//! # Components
//!
//! - `PageState`: The stage a discovered URL has reached (admitted, recorded, rejected, ...)
//! - `CrawlState`: The lock-protected visited set, page results and page budget
//! - `CrawlStats`: Counters and timestamps summarising a finished crawl

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::{Admission, CrawlState, CrawlStats, SharedCrawlState};
pub use page_state::PageState;
