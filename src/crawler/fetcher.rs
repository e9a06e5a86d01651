//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a search run:
//! - The `PageFetcher` seam the orchestrator fetches through
//! - Building the HTTP client with user agent and timeouts
//! - Error classification (timeout, connection failure, HTTP status)

use crate::config::FetcherConfig;
use crate::{FinderError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Retrieves the markup of a result page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the response body as text
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Builds an HTTP client with proper configuration
///
/// The same timeout applies to connecting and to the whole request.
///
/// # Example
///
/// ```no_run
/// use vacancy_finder::config::FetcherConfig;
/// use vacancy_finder::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> std::result::Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageFetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

/// Maps a reqwest error onto the crate's transport error variants
fn classify_error(url: &str, error: reqwest::Error) -> FinderError {
    if error.is_timeout() {
        FinderError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FinderError::Connect {
            url: url.to_string(),
        }
    } else {
        FinderError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
