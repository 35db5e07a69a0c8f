//! HTTP fetching
//!
//! The [`Fetcher`] trait is the seam between the engine and the network;
//! tests substitute deterministic stubs for the reqwest-backed
//! [`HttpFetcher`]. Redirect handling is delegated to the HTTP client, which
//! caps the hop count and reports the final URL.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Per-page fetch failures
///
/// Every variant names the URL it belongs to so diagnostics stay
/// attributable. These are recoverable at page granularity: the page is
/// charged against the budget and the crawl continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Redirect trouble for {url}: {message}")]
    Redirect { url: String, message: String },

    #[error("Failed to read body for {url}: {message}")]
    Body { url: String, message: String },
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status: u16,

    /// Response body
    pub body: String,

    /// Final URL after redirects
    pub final_url: Url,
}

/// Retrieves raw content for a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds the HTTP client used by [`HttpFetcher`]
///
/// The user agent identifies the crawler and its version; the timeout bounds
/// the whole request including body read.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = format!("pagesift/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
            final_url,
        })
    }
}

/// Maps a reqwest send error onto the fetch taxonomy
fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_redirect() {
        FetchError::Redirect {
            url,
            message: error.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        FetchError::Body {
            url,
            message: error.to_string(),
        }
    }
}
