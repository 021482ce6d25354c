//! Bounded retry with exponential backoff
//!
//! Wraps the transport with up to `max_attempts` tries per page. The wait
//! after a failed attempt `n` is `backoff_base^n + uniform(0, 0.2)` seconds;
//! the jitter keeps repeated failures from retrying in lockstep against the
//! remote server. A successful attempt returns immediately.

use crate::crawler::fetcher::{fetch_page, TransportError};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default maximum fetch attempts per page, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base of the exponential backoff, in seconds
pub const DEFAULT_BACKOFF_BASE: f64 = 1.5;

/// Upper bound of the uniform jitter added to each backoff wait, in seconds
const MAX_JITTER_SECS: f64 = 0.2;

/// All attempts for a page failed
///
/// This is the only error the pagination controller ever observes from the
/// fetch path; single-attempt `TransportError`s are absorbed here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url} after {attempts} attempts: {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

/// Retry behavior configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and backoff base
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, backoff_base: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Returns the maximum number of attempts configured
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Computes the wait before the attempt following failed attempt number
    /// `attempt` (1-indexed)
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.0..MAX_JITTER_SECS);
        let wait = self.backoff_base.powi(attempt as i32) + jitter;
        Duration::from_secs_f64(wait)
    }
}

/// Fetches a page, retrying transient failures with backoff
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The page to fetch
/// * `policy` - Attempt budget and backoff settings
///
/// # Returns
///
/// * `Ok(String)` - Body from the first successful attempt
/// * `Err(FetchError)` - All attempts failed; carries the last cause
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let mut attempt = 1;

    loop {
        debug!("GET {} (attempt {}/{})", url, attempt, policy.max_attempts);

        match fetch_page(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) => {
                if attempt >= policy.max_attempts {
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        source: e,
                    });
                }

                let wait = policy.backoff_delay(attempt);
                warn!(
                    "Request failed: {}. Retrying in {:.2}s",
                    e,
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
