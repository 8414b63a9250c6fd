//! URL handling module for Scrappy
//!
//! This module provides the dedup key normalization and the host helpers
//! used to keep a crawl inside the seed's domain.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_same_domain, parse_page_url};
pub use normalize::normalize_url;
