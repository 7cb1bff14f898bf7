//! Feed row sources
//!
//! Adapters that turn a feed (CSV file, JSON file, in-memory rows) into a
//! stream of `ImportRow`s for the runner. Sources are pull-based and
//! synchronous; only the store side of an import is async.

use crate::models::ImportRow;
use anyhow::{Context, Result};
use csv::StringRecord;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;

/// A pull-based provider of feed rows
pub trait RowSource: Send {
    /// Produce the next feed row, or `None` when the feed is exhausted
    fn next_row(&mut self) -> Result<Option<ImportRow>>;
}

/// In-memory row source, mostly for tests and programmatic seeding
pub struct VecRowSource {
    rows: VecDeque<ImportRow>,
}

impl VecRowSource {
    pub fn new(rows: Vec<ImportRow>) -> Self {
        Self { rows: rows.into() }
    }
}

impl RowSource for VecRowSource {
    fn next_row(&mut self) -> Result<Option<ImportRow>> {
        Ok(self.rows.pop_front())
    }
}

/// CSV feed source
///
/// Headers become field names; empty cells are dropped from the row so
/// downstream lookups see them as absent rather than blank. Short records
/// are tolerated (flexible mode) and cells are whitespace-trimmed.
pub struct CsvRowSource<R: Read> {
    headers: StringRecord,
    records: csv::StringRecordsIntoIter<R>,
}

impl CsvRowSource<std::fs::File> {
    /// Open a CSV feed from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open CSV feed '{}'", path.display()))?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .context("Failed to read CSV feed headers")?
            .clone();

        Ok(Self {
            headers: strip_header_bom(headers),
            records: csv_reader.into_records(),
        })
    }
}

/// Exported feeds often start with a UTF-8 BOM glued to the first header
fn strip_header_bom(headers: StringRecord) -> StringRecord {
    let mut cleaned = StringRecord::new();
    for (i, field) in headers.iter().enumerate() {
        if i == 0 {
            cleaned.push_field(field.trim_start_matches('\u{feff}'));
        } else {
            cleaned.push_field(field);
        }
    }
    cleaned
}

impl<R: Read + Send> RowSource for CsvRowSource<R> {
    fn next_row(&mut self) -> Result<Option<ImportRow>> {
        let record = match self.records.next() {
            Some(record) => record.context("Failed to read CSV feed record")?,
            None => return Ok(None),
        };

        let mut fields = Map::new();
        for (header, cell) in self.headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            fields.insert(header.to_string(), Value::String(cell.to_string()));
        }

        Ok(Some(ImportRow::new(fields)))
    }
}

/// JSON feed source
///
/// The feed is a single array of objects, loaded eagerly; one object
/// becomes one row.
pub struct JsonRowSource {
    rows: VecDeque<Map<String, Value>>,
}

impl JsonRowSource {
    /// Open a JSON feed from a file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON feed '{}'", path.display()))?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let rows: Vec<Map<String, Value>> =
            serde_json::from_str(text).context("JSON feed must be an array of objects")?;

        Ok(Self { rows: rows.into() })
    }
}

impl RowSource for JsonRowSource {
    fn next_row(&mut self) -> Result<Option<ImportRow>> {
        Ok(self.rows.pop_front().map(ImportRow::new))
    }
}
