use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ParseError;

/// A row the normalizer discarded, and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    /// 0-based position in the input table
    pub index: usize,
    /// 1-based line in the source file, when known
    pub line: Option<u64>,
    /// Column whose cell could not be coerced; `None` when the whole record
    /// could not be decoded
    pub column: Option<String>,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: ParseError,
}

fn serialize_reason<S: serde::Serializer>(
    reason: &ParseError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&reason.to_string())
}

/// Summary of one normalization run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizationReport {
    pub run_id: Uuid,
    pub normalized_at: DateTime<Utc>,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped: Vec<DroppedRow>,
}

impl NormalizationReport {
    pub fn new(rows_read: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            normalized_at: Utc::now(),
            rows_read,
            rows_kept: 0,
            dropped: Vec::new(),
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.dropped.len()
    }

    /// True when every input row survived
    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty() && self.rows_kept == self.rows_read
    }

    /// Dropped rows grouped by `(column, reason kind)`
    pub fn drop_counts(&self) -> BTreeMap<(Option<String>, &'static str), usize> {
        let mut counts = BTreeMap::new();
        for row in &self.dropped {
            *counts
                .entry((row.column.clone(), row.reason.kind()))
                .or_insert(0) += 1;
        }
        counts
    }
}
