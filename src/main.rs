//! Quarry main entry point
//!
//! Command-line interface for the paginated-listing harvester.

use clap::Parser;
use quarry::config::load_config;
use quarry::crawler::{Controller, CrawlOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Process exit codes, from the run-outcome contract:
/// 0 = completed, 1 = failed, 2 = interrupted by the user.
const EXIT_OK: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_INTERRUPTED: i32 = 2;

/// Quarry: a polite paginated-listing harvester
///
/// Quarry walks a paginated HTML listing one page at a time, extracting
/// records and appending them to the configured CSV and/or SQLite sinks,
/// with bounded retries and a politeness delay between pages.
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version)]
#[command(about = "A polite paginated-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured page limit (0 = unbounded)
    #[arg(long, value_name = "N")]
    limit_pages: Option<u32>,

    /// Validate config and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return EXIT_FAILED;
        }
    };

    if let Some(limit) = cli.limit_pages {
        tracing::debug!("Overriding page limit: {}", limit);
        config.crawl.page_limit = limit;
    }

    if cli.dry_run {
        print_plan(&config);
        return EXIT_OK;
    }

    let mut controller = match Controller::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Failed to start crawl: {}", e);
            return EXIT_FAILED;
        }
    };

    // Coarse cancellation: Ctrl-C during any suspension point aborts the
    // run; batches persisted so far remain valid.
    tokio::select! {
        result = controller.run() => match result {
            Ok(outcome) => {
                report_outcome(outcome);
                EXIT_OK
            }
            Err(e) => {
                tracing::error!("Crawl failed: {}", e);
                EXIT_FAILED
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted by user.");
            EXIT_INTERRUPTED
        }
    }
}

fn report_outcome(outcome: CrawlOutcome) {
    match outcome {
        CrawlOutcome::ReachedPageLimit => {
            tracing::info!("Crawl completed: reached page limit");
        }
        CrawlOutcome::ExhaustedPagination => {
            tracing::info!("Crawl completed: no further pages");
        }
        CrawlOutcome::CycleDetected => {
            tracing::warn!("Crawl stopped: pagination cycle detected");
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quarry=info,warn"),
            1 => EnvFilter::new("quarry=debug,info"),
            2 => EnvFilter::new("quarry=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn print_plan(config: &quarry::config::Config) {
    println!("=== Quarry Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed URL: {}", config.crawl.seed_url);
    if config.crawl.page_limit == 0 {
        println!("  Page limit: unbounded");
    } else {
        println!("  Page limit: {}", config.crawl.page_limit);
    }
    println!("  Politeness delay: {}s (+ up to 15% jitter)", config.crawl.delay_seconds);
    println!("  Max attempts per page: {}", config.crawl.max_attempts);
    println!("  Backoff base: {}s", config.crawl.backoff_base);
    println!("  Request timeout: {}s", config.crawl.timeout_seconds);

    println!("\nHTTP:");
    match &config.http.user_agent {
        Some(agent) => println!("  User-Agent: {}", agent),
        None => println!("  User-Agent: (default browser string)"),
    }
    for (name, value) in &config.http.headers {
        println!("  Header override: {}: {}", name, value);
    }

    println!("\nSinks:");
    if let Some(path) = &config.output.csv_path {
        println!("  CSV: {}", path);
    }
    if let Some(path) = &config.output.sqlite_path {
        println!("  SQLite: {}", path);
    }
    if config.output.csv_path.is_none() && config.output.sqlite_path.is_none() {
        println!("  (none configured - records will not be persisted)");
    }

    println!("\n✓ Configuration is valid");
}
