//! Crawler module for paginated listing traversal
//!
//! This module contains the core crawling logic, including:
//! - Single-attempt HTTP transport
//! - Bounded retry with exponential backoff and jitter
//! - Record extraction from listing pages
//! - Pagination control and termination

mod controller;
mod extractor;
mod fetcher;
mod retry;

pub use controller::{run_crawl, Controller, CrawlOutcome};
pub use extractor::{extract_records, PageExtract, Record};
pub use fetcher::{build_http_client, fetch_page, TransportError, DEFAULT_USER_AGENT};
pub use retry::{fetch_with_retry, FetchError, RetryPolicy};
