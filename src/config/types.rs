use serde::Deserialize;

/// Main configuration structure for Scrappy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneous in-flight page fetches
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Maximum number of pages admitted for visiting
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Per-fetch timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Skip spawning a branch for a link some other branch already scheduled
    #[serde(rename = "dedupe-scheduling")]
    pub dedupe_scheduling: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            max_pages: 30,
            request_timeout: 30,
            dedupe_scheduling: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Scrappy".to_string(),
            crawler_version: "1.0".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV report file
    #[serde(rename = "report-path")]
    pub report_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "report.csv".to_string(),
        }
    }
}
