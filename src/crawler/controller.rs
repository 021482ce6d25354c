//! Pagination controller - main crawl orchestration logic
//!
//! This module drives the page-by-page traversal: fetch with retry, extract
//! records, hand the batch to every configured sink, then either advance to
//! the resolved next-page URL (after the politeness pause) or terminate.
//! The walk is strictly sequential, so at most one request is in flight at
//! any time.

use crate::config::Config;
use crate::crawler::extractor::{extract_records, Record};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::retry::{fetch_with_retry, RetryPolicy};
use crate::sink::{CsvSink, Sink, SqliteSink};
use rand::Rng;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// How a finished crawl ended
///
/// A run always ends in exactly one of these, or in an abort from fetch
/// exhaustion surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The configured page limit was reached
    ReachedPageLimit,

    /// The listing ran out of next-page links
    ExhaustedPagination,

    /// A next-page link pointed back at an already-visited page
    CycleDetected,
}

/// A configured sink plus its live/disabled flag
///
/// A sink that fails to initialize or write is disabled for the remainder
/// of the run; the traversal itself keeps going.
struct SinkSlot {
    sink: Box<dyn Sink>,
    live: bool,
}

/// Main pagination controller
pub struct Controller {
    config: Config,
    client: Client,
    retry: RetryPolicy,
    sinks: Vec<SinkSlot>,
}

impl Controller {
    /// Creates a controller from a validated configuration
    ///
    /// Builds the HTTP client, constructs the configured sinks in order
    /// (CSV first, then SQLite), and runs each sink's idempotent
    /// initialization. A sink whose initialization fails is disabled with a
    /// warning rather than aborting the run.
    pub fn new(config: Config) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.crawl.timeout_seconds);
        let client = build_http_client(&config.http, timeout)?;
        let retry = RetryPolicy::new(config.crawl.max_attempts, config.crawl.backoff_base);

        let mut sinks: Vec<SinkSlot> = Vec::new();
        if let Some(path) = &config.output.csv_path {
            sinks.push(SinkSlot {
                sink: Box::new(CsvSink::new(Path::new(path))),
                live: true,
            });
        }
        if let Some(path) = &config.output.sqlite_path {
            sinks.push(SinkSlot {
                sink: Box::new(SqliteSink::new(Path::new(path))),
                live: true,
            });
        }

        if sinks.is_empty() {
            info!("No sinks configured; records will be extracted but not persisted");
        }

        for slot in &mut sinks {
            if let Err(e) = slot.sink.initialize() {
                warn!(
                    "Sink '{}' failed to initialize, disabled for this run: {}",
                    slot.sink.name(),
                    e
                );
                slot.live = false;
            }
        }

        Ok(Self {
            config,
            client,
            retry,
            sinks,
        })
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The traversal terminated cleanly
    /// * `Err(QuarryError)` - Fetch attempts were exhausted for a page
    pub async fn run(&mut self) -> crate::Result<CrawlOutcome> {
        let mut url = Url::parse(&self.config.crawl.seed_url)?;
        let mut page: u32 = 1;
        let page_limit = self.config.crawl.page_limit;

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(url.to_string());

        loop {
            info!("Fetching page {}: {}", page, url);
            let body = fetch_with_retry(&self.client, &url, &self.retry).await?;

            let extract = extract_records(&body);
            debug!("Extracted {} records from page {}", extract.records.len(), page);

            // Every live sink sees every page's batch, empty or not
            self.persist_batch(&extract.records);

            if page_limit != 0 && page >= page_limit {
                info!("Reached page limit of {}. Stopping.", page_limit);
                return Ok(CrawlOutcome::ReachedPageLimit);
            }

            let Some(next_href) = extract.next_href else {
                info!("No next page link. Finished.");
                return Ok(CrawlOutcome::ExhaustedPagination);
            };

            let next_url = match url.join(&next_href) {
                Ok(resolved) => resolved,
                Err(e) => {
                    warn!("Could not resolve next link '{}': {}. Stopping.", next_href, e);
                    return Ok(CrawlOutcome::ExhaustedPagination);
                }
            };

            if !visited.insert(next_url.to_string()) {
                warn!("Next link {} was already visited. Stopping.", next_url);
                return Ok(CrawlOutcome::CycleDetected);
            }

            self.politeness_pause().await;

            url = next_url;
            page += 1;
        }
    }

    /// Hands one page's batch to every live sink, in configured order
    ///
    /// A write failure disables that sink for the rest of the run but never
    /// rolls back other sinks or stops the traversal.
    fn persist_batch(&mut self, records: &[Record]) {
        for slot in &mut self.sinks {
            if !slot.live {
                continue;
            }

            match slot.sink.write_batch(records) {
                Ok(()) => {
                    if !records.is_empty() {
                        info!("Wrote {} records to {} sink", records.len(), slot.sink.name());
                    }
                }
                Err(e) => {
                    warn!(
                        "Sink '{}' failed, disabled for the rest of the run: {}",
                        slot.sink.name(),
                        e
                    );
                    slot.live = false;
                }
            }
        }
    }

    /// Sleeps the politeness delay between pages
    ///
    /// The base delay gets up to 15% positive jitter so successive runs do
    /// not hit the server on an exact cadence.
    async fn politeness_pause(&self) {
        let base = self.config.crawl.delay_seconds;
        if base <= 0.0 {
            return;
        }

        let jitter = rand::thread_rng().gen_range(0.0..(base * 0.15));
        let wait = base + jitter;
        debug!("Sleeping for {:.2}s", wait);
        tokio::time::sleep(Duration::from_secs_f64(wait)).await;
    }
}

/// Runs a complete crawl with the given configuration
///
/// Convenience wrapper over [`Controller::new`] and [`Controller::run`].
pub async fn run_crawl(config: Config) -> crate::Result<CrawlOutcome> {
    let mut controller = Controller::new(config)?;
    controller.run().await
}
