//! CSV export of table and comparison views.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::catalog::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::record::{format_value, Record};

/// MIME type of exported files.
pub const CSV_MIME: &str = "text/csv";

/// Which surface an export comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Filtered and sorted table.
    Table,
    /// Side-by-side comparison.
    Comparison,
}

/// Serializes `records` with `columns`.
///
/// The header row holds the column labels, unquoted. Every data field is
/// formatted for display and always quoted. Rows are separated by `\n` with
/// no trailing newline. Records are written in the order given.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn to_csv<'a, I>(records: I, columns: &[&ColumnDescriptor]) -> Result<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let header = columns
        .iter()
        .map(|c| c.label.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let mut lines = vec![header];
    for record in records {
        lines.push(quoted_row(record, columns)?);
    }
    Ok(lines.join("\n"))
}

fn quoted_row(record: &Record, columns: &[&ColumnDescriptor]) -> Result<String> {
    if columns.is_empty() {
        return Ok(String::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| format_value(record.get(&c.key))))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.to_string()))?;
    let mut line = String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Builds the download file name for an export made at `now`.
///
/// Tables use a second-resolution timestamp; comparisons use Unix
/// milliseconds.
#[must_use]
pub fn export_file_name(kind: ExportKind, now: DateTime<Utc>) -> String {
    match kind {
        ExportKind::Table => format!("ap-catalog-{}.csv", now.format("%Y-%m-%dT%H-%M-%S")),
        ExportKind::Comparison => format!("ap-comparison-{}.csv", now.timestamp_millis()),
    }
}

/// Writes exported CSV text to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_csv<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|e| Error::Export(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), bytes = text.len(), mime = CSV_MIME, "CSV exported");
    Ok(())
}
