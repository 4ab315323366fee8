//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured agent string
//! - Retrieving page bodies and robots.txt documents
//! - Classifying transport and status failures
//!
//! Every URL gets a single attempt; nothing here retries.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Highest status code still treated as a usable response
pub const MAX_OK_STATUS: u16 = 310;

/// A failed retrieval
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, TLS or timeout failure
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status above 310
    #[error("{status} {reason} on {url}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },
}

impl FetchError {
    /// The status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { .. } => None,
            Self::HttpStatus { status, .. } => Some(*status),
        }
    }
}

/// Builds an HTTP client that identifies itself with `agent`
///
/// # Arguments
///
/// * `agent` - The agent string sent as `User-Agent`
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use squid::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Squidbot", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single-attempt retrievals on behalf of one agent
///
/// Cloning is cheap: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    agent: String,
}

impl Fetcher {
    /// Creates a fetcher with its own client
    pub fn new(agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(agent, timeout)?,
            agent: agent.to_string(),
        })
    }

    /// The agent string this fetcher presents
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Retrieves `url` and returns its body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The full body of a response with status <= 310
    /// * `Err(FetchError::HttpStatus)` - Status above 310; body is discarded unread
    /// * `Err(FetchError::Transport)` - The request or body read failed
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, self.agent.as_str())
            .send()
            .await
            .map_err(transport)?;

        // Dropping the response on any early return releases its connection
        let status = response.status();
        if is_failure(status) {
            let error = status_error(url, status);
            tracing::debug!("{}", error);
            return Err(error);
        }

        response.text().await.map_err(transport)
    }
}

/// Statuses above 310 are failures; everything at or below is a page
fn is_failure(status: StatusCode) -> bool {
    status.as_u16() > MAX_OK_STATUS
}

fn status_error(url: &Url, status: StatusCode) -> FetchError {
    FetchError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
