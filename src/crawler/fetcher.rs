//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the identifying user agent
//! - Following redirects up to a fixed bound
//! - Classifying failures into [`FetchError`]
//!
//! There is no retry at this layer; a failed URL simply stays pending and is
//! dispatched again in a later round.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be downloaded
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, timeout or body read failure
    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// The final response was not 2xx
    #[error("Bad status code {status} for {url}")]
    BadStatus { url: String, status: u16 },

    /// The redirect chain was longer than allowed
    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },
}

impl FetchError {
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_redirect() {
            Self::TooManyRedirects {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts and the redirect bound
/// * `user_agent` - The identifying header value
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::{CrawlerConfig, UserAgentConfig};
/// use sumi_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.value.as_str())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(crawler.max_redirects as usize))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads page bodies
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(crawler, user_agent)?,
        })
    }

    /// Fetches a URL and returns the raw response body
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Redirect chain over the bound | `TooManyRedirects` |
    /// | Final status not 2xx | `BadStatus` |
    /// | DNS / connect / timeout / body read | `Transport` |
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response.url().as_str() != url {
            tracing::debug!("{} redirected to {}", url, response.url());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(body.to_vec())
    }
}
