//! Persistence sinks for extracted records
//!
//! A sink is any destination satisfying the `{initialize, write_batch}`
//! capability. Two variants ship with the crate: an append-only CSV file
//! and an embedded SQLite database. Sinks are independent and composable;
//! the controller may drive zero, one, or both per page, and a failure in
//! one never rolls back a write already committed to another.

mod csv;
mod sqlite;

pub use self::csv::CsvSink;
pub use self::sqlite::SqliteSink;

use crate::crawler::Record;
use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to initialize sink: {0}")]
    Init(String),

    #[error("Failed to write batch: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for persistence destinations
///
/// `initialize` must be idempotent: safe to call on a pre-existing
/// destination and safe to call more than once. `write_batch` receives one
/// page's records as a unit, in extraction order; an empty batch is a
/// no-op, not an error.
pub trait Sink {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Prepares the destination for appending
    fn initialize(&mut self) -> SinkResult<()>;

    /// Appends one page's batch of records
    fn write_batch(&mut self, records: &[Record]) -> SinkResult<()>;
}
