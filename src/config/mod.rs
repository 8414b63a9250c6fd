//! Configuration module for Scrappy
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use scrappy::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrappy.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
