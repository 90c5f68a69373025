//! Raw tabular input
//!
//! CSV catalogs from the NASA Exoplanet Archive start with `#` comment blocks;
//! those are skipped, as are rows with no values at all.

use std::collections::HashMap;
use std::io::Read;

use crate::logic::error::{PipelineError, PipelineResult};

/// One untyped row: column name → cell text. Empty cells are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Zero-based position among the table's data rows
    pub index: usize,
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self { index, cells: HashMap::new() }
    }

    pub fn from_pairs<K, V>(index: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new(index);
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.cells.insert(column.into(), trimmed.to_string());
        }
    }

    /// Non-empty cell value
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parsed upload
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows skipped because every cell was empty
    pub blank_rows: usize,
    /// Original file name, used for mission detection
    pub source_name: Option<String>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows, blank_rows: 0, source_name: None }
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a catalog CSV.
    /// Header names are lowercased so lookups match the schema column tables
    pub fn from_csv<R: Read>(reader: R) -> PipelineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(|e| PipelineError::EmptyInput(format!("could not read CSV header: {}", e)))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim().to_ascii_lowercase())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::EmptyInput("file has no header row".to_string()));
        }

        let mut rows = Vec::new();
        let mut blank_rows = 0;

        for (line, record) in rdr.byte_records().enumerate() {
            let record = record.map_err(|e| {
                PipelineError::EmptyInput(format!("unparseable CSV at data row {}: {}", line, e))
            })?;

            let mut row = RawRow::new(rows.len() + blank_rows);
            for (header, cell) in headers.iter().zip(record.iter()) {
                if !header.is_empty() {
                    row.insert(header.as_str(), String::from_utf8_lossy(cell));
                }
            }

            if row.is_blank() {
                blank_rows += 1;
            } else {
                rows.push(row);
            }
        }

        tracing::debug!(
            "Parsed CSV: {} columns, {} rows ({} blank skipped)",
            headers.len(),
            rows.len(),
            blank_rows
        );

        Ok(Self { headers, rows, blank_rows, source_name: None })
    }
}
