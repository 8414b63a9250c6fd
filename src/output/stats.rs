//! Crawl statistics display
//!
//! Renders the [`CrawlStats`] collected during a crawl for the terminal.

use crate::state::{CrawlStats, PageState};
use std::fmt::Write;

/// Formats statistics as a human-readable block of text
pub fn format_statistics(stats: &CrawlStats) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(
        out,
        "  Started: {}",
        stats.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(duration) = stats.duration() {
        let _ = writeln!(
            out,
            "  Duration: {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }
    let _ = writeln!(
        out,
        "  Pages admitted: {} / {}",
        stats.admitted, stats.max_pages
    );
    let _ = writeln!(out, "  Pages fetched: {}", fetched_count(stats));
    let _ = writeln!(out);

    let _ = writeln!(out, "URLs by Outcome:");
    for state in PageState::terminal_states() {
        let count = stats.count(state);
        if count > 0 {
            let _ = writeln!(out, "  {}: {}", state, count);
        }
    }
    let _ = writeln!(out);

    let success_rate = if stats.admitted > 0 {
        (stats.recorded() as f64 / stats.admitted as f64) * 100.0
    } else {
        0.0
    };

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} admitted pages recorded)",
        success_rate,
        stats.recorded(),
        stats.admitted
    );

    out
}

/// Counts the URLs that reached a terminal state holding a budget slot
fn fetched_count(stats: &CrawlStats) -> u64 {
    PageState::terminal_states()
        .into_iter()
        .filter(PageState::consumes_budget)
        .map(|state| stats.count(state))
        .sum()
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    print!("{}", format_statistics(stats));
}
