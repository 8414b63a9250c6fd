//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for pages and robots.txt
//! - Status and Content-Type validation
//! - Error classification

use crate::config::Config;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;

/// Typed failure of a fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("Unable to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body is not of the expected type
    #[error("Unexpected content type for {url}: '{content_type}'")]
    ContentType { url: String, content_type: String },

    /// DNS, connect, timeout or body read failure
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns the URL the failed fetch was for
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::ContentType { url, .. } | Self::Network { url, .. } => {
                url
            }
        }
    }

    /// Returns true for transport-level failures (timeouts, refused connections)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher shared by every branch of a crawl
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a fetcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL and returns its body text
    ///
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Connect/DNS/timeout failure | `FetchError::Network` |
    /// | Status outside 200-299 | `FetchError::Status` |
    /// | Content-Type not starting with `expected_content_type` | `FetchError::ContentType` |
    /// | Body cannot be read | `FetchError::Network` |
    ///
    /// There are no retries: a failed fetch is final for that URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `expected_content_type` - Required prefix of the Content-Type header
    pub async fn fetch(&self, url: &str, expected_content_type: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.starts_with(expected_content_type) {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })
    }
}
