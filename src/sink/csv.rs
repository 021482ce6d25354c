//! Append-only CSV sink
//!
//! Appends records to a delimited file, writing the header row only when
//! the destination is currently absent or empty. Whether a header is
//! needed is derived from the file on disk, not from in-memory state, so
//! repeated process runs against the same destination append correctly.

use crate::crawler::Record;
use crate::sink::{Sink, SinkError, SinkResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// CSV file sink
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Creates a sink targeting the given destination path
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Destination path of this sink
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn initialize(&mut self) -> SinkResult<()> {
        // The file itself is created lazily on the first non-empty batch;
        // only the parent directory needs to exist up front.
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| SinkError::Init(format!("{}: {}", parent.display(), e)))?;
            }
        }
        Ok(())
    }

    fn write_batch(&mut self, records: &[Record]) -> SinkResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let needs_header = !has_content(&self.path);

        let mut output = String::new();
        if needs_header {
            output.push_str(&format_row(Record::FIELD_NAMES));
        }
        for record in records {
            output.push_str(&format_row(record.field_values()));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(output.as_bytes())?;

        Ok(())
    }
}

/// Whether the destination already holds data (and therefore a header)
fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Formats one CSV row with a trailing newline
fn format_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut row = fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Quotes a field when it embeds a delimiter, quote, or line break
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(text: &str, author: &str, tags: &str) -> Record {
        Record {
            text: text.to_string(),
            author: author.to_string(),
            tags: tags.to_string(),
        }
    }

    #[test]
    fn test_header_written_once_across_batches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::new(&path);
        sink.initialize().unwrap();
        sink.write_batch(&[record("one", "a", "")]).unwrap();
        sink.write_batch(&[record("two", "b", "")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "quote,author,tags");
        assert_eq!(lines[1], "one,a,");
        assert_eq!(lines[2], "two,b,");
    }

    #[test]
    fn test_header_written_once_across_sink_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        // Two separate sinks against the same destination, as two process
        // runs would be
        let mut first = CsvSink::new(&path);
        first.initialize().unwrap();
        first.write_batch(&[record("one", "a", "")]).unwrap();

        let mut second = CsvSink::new(&path);
        second.initialize().unwrap();
        second.write_batch(&[record("two", "b", "")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("quote,author,tags").count(), 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_no_header_for_prepopulated_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "existing,rows,here\n").unwrap();

        let mut sink = CsvSink::new(&path);
        sink.initialize().unwrap();
        sink.write_batch(&[record("one", "a", "")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("quote,author,tags"));
        assert!(content.starts_with("existing,rows,here\n"));
        assert!(content.ends_with("one,a,\n"));
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::new(&path);
        sink.initialize().unwrap();
        sink.write_batch(&[]).unwrap();

        // No file is created for an empty batch
        assert!(!path.exists());
    }

    #[test]
    fn test_escaping_of_embedded_delimiters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvSink::new(&path);
        sink.initialize().unwrap();
        sink.write_batch(&[record(
            r#"He said, "never again""#,
            "O'Brien, Flann",
            "irony, quotes",
        )])
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data_line = content.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            r#""He said, ""never again""","O'Brien, Flann","irony, quotes""#
        );
    }

    #[test]
    fn test_initialize_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");

        let mut sink = CsvSink::new(&path);
        sink.initialize().unwrap();
        assert!(path.parent().unwrap().exists());

        sink.write_batch(&[record("one", "a", "")]).unwrap();
        assert!(path.exists());
    }
}
