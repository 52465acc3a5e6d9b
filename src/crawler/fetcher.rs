//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the fixed identification header
//! - GET requests returning the body and declared Content-Type
//! - Error classification
//!
//! HTML is read as text, decoded with the charset the response declares.
//! PDF and DOCX payloads are read as raw bytes. No retries are attempted; a
//! failed fetch is reported once and the coordinator moves on.

use crate::config::CrawlerConfig;
use reqwest::{Client, Response};
use std::future::Future;
use std::time::Duration;

/// Result of a fetch operation, generic over the body representation
#[derive(Debug)]
pub enum FetchResult<B> {
    /// Successfully fetched the resource
    Success {
        /// Content-Type header value (empty if absent)
        content_type: String,
        /// Decoded text or raw bytes
        body: B,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl<B> FetchResult<B> {
    /// Short description of a failed fetch, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request made through this client sends the configured
/// `User-Agent` and nothing else identifying: no cookies, no auth.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::CrawlerConfig;
/// use site_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.request_timeout.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL as text and classifies the outcome
///
/// The body is decoded using the `charset` parameter of the response's
/// Content-Type, falling back to UTF-8.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Success` with the decoded body |
/// | Any other status | `HttpError` |
/// | Timeout | `NetworkError("Request timeout")` |
/// | Connection failure | `NetworkError("Connection failed: …")` |
/// | Body read failure | `NetworkError` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult<String> {
    fetch_with(client, url, Response::text).await
}

/// Fetches a URL as raw bytes, for binary document formats
pub async fn fetch_bytes(client: &Client, url: &str) -> FetchResult<Vec<u8>> {
    fetch_with(client, url, |response| async move {
        response.bytes().await.map(|body| body.to_vec())
    })
    .await
}

async fn fetch_with<B, F, Fut>(client: &Client, url: &str, read_body: F) -> FetchResult<B>
where
    F: FnOnce(Response) -> Fut,
    Fut: Future<Output = reqwest::Result<B>>,
{
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_request_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match read_body(response).await {
        Ok(body) => FetchResult::Success { content_type, body },
        Err(e) => classify_request_error(e),
    }
}

fn classify_request_error<B>(e: reqwest::Error) -> FetchResult<B> {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
        }
    }
}

/// Checks whether a declared Content-Type is HTML
///
/// Matches `text/html` with or without parameters, case-insensitively.
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("text/html")
}
