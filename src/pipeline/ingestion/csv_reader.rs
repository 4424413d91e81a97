use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::InputConfig;
use crate::constants::MISSING_MARKERS;
use crate::error::{NormalizerError, Result};
use crate::observability::metrics;
use crate::types::{RawRecord, RawTable, RawValue};

/// Cells that a dataframe loader would read as numbers: optional minus sign,
/// digits, optional dot-decimal fraction
static NUMERIC_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").expect("numeric cell pattern is valid"));

/// How to read a listings file
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub infer_numbers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_numbers: true,
        }
    }
}

impl TryFrom<&InputConfig> for CsvOptions {
    type Error = NormalizerError;

    fn try_from(config: &InputConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter).map_err(|_| {
            NormalizerError::Config(format!(
                "CSV delimiter must be a single byte, got '{}'",
                config.delimiter
            ))
        })?;
        Ok(Self {
            delimiter,
            infer_numbers: config.infer_numbers,
        })
    }
}

/// Read a listings CSV from disk
pub fn read_csv_file(path: &Path, options: &CsvOptions) -> Result<RawTable> {
    info!("📥 Reading listings from {}", path.display());
    let file = File::open(path)?;
    read_csv(file, options)
}

/// Read a listings CSV from any reader. The first row is the header.
///
/// A record that cannot be decoded stays in the table as an undecodable row,
/// so the normalizer counts and reports it. A header that cannot be read is fatal.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    // No header at all means there is no table to speak of
    if columns.iter().all(|c| c.is_empty()) {
        return Err(NormalizerError::EmptyResult { rows_read: 0 });
    }
    debug!("CSV header: {:?}", columns);

    let mut rows = Vec::new();
    let mut undecodable = 0usize;
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line());
                warn!(line = ?line, "Undecodable CSV record: {}", e);
                undecodable += 1;
                rows.push(RawRecord::undecodable(line, e.to_string()));
                continue;
            }
        };

        let mut row = RawRecord::new();
        row.line = record.position().map(|p| p.line());
        for (i, column) in columns.iter().enumerate() {
            // Short rows read as missing for the trailing columns
            let value = record
                .get(i)
                .map(|cell| parse_cell(cell, options.infer_numbers))
                .unwrap_or(RawValue::Missing);
            row.fields.insert(column.clone(), value);
        }
        rows.push(row);
    }

    metrics::ingest::rows_read(rows.len());
    info!("Read {} rows ({} undecodable)", rows.len(), undecodable);
    Ok(RawTable::new(columns, rows))
}

/// Classify one trimmed cell
pub fn parse_cell(cell: &str, infer_numbers: bool) -> RawValue {
    if MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return RawValue::Missing;
    }
    if infer_numbers && NUMERIC_CELL.is_match(cell) {
        if let Ok(n) = cell.parse::<f64>() {
            return RawValue::Number(n);
        }
    }
    RawValue::Text(cell.to_string())
}
