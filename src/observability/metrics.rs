//! Metrics for the normalization pipeline
//!
//! Recorded through the `metrics` facade; they are no-ops until the embedding
//! application installs a recorder.

use std::fmt;

/// All metric names used by the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    IngestRowsRead,
    NormalizeRowsKept,
    NormalizeRowsDropped,
    NormalizeBatchesProcessed,
    NormalizeBatchSize,
    NormalizeRunsFailed,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "listings_ingest_rows_read_total",
            MetricName::NormalizeRowsKept => "listings_normalize_rows_kept_total",
            MetricName::NormalizeRowsDropped => "listings_normalize_rows_dropped_total",
            MetricName::NormalizeBatchesProcessed => "listings_normalize_batches_processed_total",
            MetricName::NormalizeBatchSize => "listings_normalize_batch_size",
            MetricName::NormalizeRunsFailed => "listings_normalize_runs_failed_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod ingest {
    use super::MetricName;

    pub fn rows_read(count: usize) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(count as u64);
    }
}

pub mod normalize {
    use super::MetricName;

    /// Record rows that made it into the cleaned table
    pub fn rows_kept(normalizer: &str, count: usize) {
        ::metrics::counter!(MetricName::NormalizeRowsKept.as_str(), "normalizer" => normalizer.to_string())
            .increment(count as u64);
    }

    /// Record a dropped row, labelled by the offending column and reason kind
    pub fn row_dropped(column: &str, reason: &'static str) {
        ::metrics::counter!(
            MetricName::NormalizeRowsDropped.as_str(),
            "column" => column.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Record that a table was processed
    pub fn batch_processed(batch_size: usize) {
        ::metrics::histogram!(MetricName::NormalizeBatchSize.as_str()).record(batch_size as f64);
        ::metrics::counter!(MetricName::NormalizeBatchesProcessed.as_str()).increment(1);
    }

    /// Record a run that ended in a schema or empty-result error
    pub fn run_failed(kind: &'static str) {
        ::metrics::counter!(MetricName::NormalizeRunsFailed.as_str(), "kind" => kind).increment(1);
    }
}
