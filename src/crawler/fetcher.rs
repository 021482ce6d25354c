//! HTTP transport
//!
//! This module issues single-attempt GET requests for the crawler:
//! - Building an HTTP client with the merged default and override headers
//! - Fetching one page body with a full round-trip timeout
//!
//! There is no retry logic here; see `crawler::retry` for that layer.

use crate::config::HttpConfig;
use crate::QuarryError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Browser-like User-Agent used when the configuration does not set one
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Failure of a single fetch attempt
///
/// Non-2xx status, connection failure, and timeout all land here; the
/// transport does not distinguish further.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Builds an HTTP client with the session headers and timeout
///
/// Default headers match a polite browser session; entries from
/// `http.headers` in the configuration are merged over them.
///
/// # Arguments
///
/// * `http` - User-Agent and header override configuration
/// * `timeout` - Full round-trip timeout (connect + read)
pub fn build_http_client(http: &HttpConfig, timeout: Duration) -> crate::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );

    for (name, value) in &http.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| QuarryError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| QuarryError::InvalidHeader(name.to_string()))?;
        headers.insert(name, value);
    }

    let user_agent = http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a single page body
///
/// One GET, no retry, no sleep. Any non-2xx response is an error.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The page to fetch
///
/// # Returns
///
/// * `Ok(String)` - The raw response body
/// * `Err(TransportError)` - The attempt failed
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, TransportError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(|e| TransportError::Request {
        url: url.to_string(),
        source: e,
    })
}
