//! Output module for crawl reports
//!
//! This module handles:
//! - Writing the recorded pages as a CSV report
//! - Summarising crawl statistics for the terminal

mod csv_report;
pub mod stats;

pub use csv_report::{write_csv_report, write_report_to, REPORT_HEADERS};
pub use stats::{format_statistics, print_statistics};
