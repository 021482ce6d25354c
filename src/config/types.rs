use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Quarry
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl traversal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Full URL of the first listing page
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Stop after this many pages; 0 means unbounded
    #[serde(rename = "page-limit", default)]
    pub page_limit: u32,

    /// Base politeness delay between page fetches, in seconds
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Maximum fetch attempts per page, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base of the exponential retry backoff, in seconds
    #[serde(rename = "backoff-base", default = "default_backoff_base")]
    pub backoff_base: f64,

    /// Full round-trip HTTP timeout, in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// HTTP header configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Custom User-Agent string; a browser-like default is used when absent
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Extra header overrides, merged over the built-in defaults
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Persistence sink configuration
///
/// Both paths are optional. With neither set, records are extracted but not
/// persisted, which is useful for validating a seed URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the append-only CSV destination
    #[serde(rename = "csv-path")]
    pub csv_path: Option<String>,

    /// Path to the SQLite database file
    #[serde(rename = "sqlite-path")]
    pub sqlite_path: Option<String>,
}

fn default_delay_seconds() -> f64 {
    1.0
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> f64 {
    1.5
}

fn default_timeout_seconds() -> u64 {
    15
}
