//! SQLite sink
//!
//! Persists records to an embedded SQLite database. Initialization issues
//! an idempotent table-creation statement, so it is safe against a
//! pre-existing store; each batch is inserted inside one transaction.

use crate::crawler::Record;
use crate::sink::{Sink, SinkError, SinkResult};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Idempotent schema for the records table
///
/// One auto-increment identity column plus one text column per record
/// field, in record field order.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    quote TEXT NOT NULL,
    author TEXT,
    tags TEXT
);
";

/// SQLite database sink
pub struct SqliteSink {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteSink {
    /// Creates a sink targeting the given database path
    ///
    /// The connection is opened during `initialize`, not here, so a
    /// misconfigured destination surfaces as a sink-initialization failure
    /// rather than a construction error.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            conn: None,
        }
    }

    /// Creates a sink backed by an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            path: PathBuf::new(),
            conn: Some(conn),
        })
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        self.conn.as_ref().expect("sink not initialized")
    }
}

impl Sink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn initialize(&mut self) -> SinkResult<()> {
        if self.conn.is_none() {
            let conn = Connection::open(&self.path)
                .map_err(|e| SinkError::Init(format!("{}: {}", self.path.display(), e)))?;
            self.conn = Some(conn);
        }

        if let Some(conn) = &self.conn {
            conn.execute_batch(SCHEMA_SQL)?;
        }
        Ok(())
    }

    fn write_batch(&mut self, records: &[Record]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| SinkError::Write("sqlite sink not initialized".to_string()))?;

        let tx = conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO quotes (quote, author, tags) VALUES (?1, ?2, ?3)")?;
            for record in records {
                stmt.execute(params![record.text, record.author, record.tags])?;
            }
        }
        tx.commit()?;

        Ok(())
    }
}
