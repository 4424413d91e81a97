use crate::error::{NormalizerError, Result};
use crate::observability::metrics;
use crate::types::RawTable;

use super::NormalizedTable;

/// A stateless transformation from a raw table to a cleaned one.
/// Implementations own no external resource and may be shared across threads.
pub trait TableNormalizer: Send + Sync {
    /// Clean every row, dropping the ones that cannot be coerced
    fn normalize(&self, table: &RawTable) -> Result<NormalizedTable>;

    /// Get a human-readable name for this normalizer
    fn name(&self) -> &str;
}

/// A wrapper that adds metrics to any normalizer implementation
pub struct MetricsNormalizer<N: TableNormalizer> {
    inner: N,
}

impl<N: TableNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> N {
        self.inner
    }
}

impl<N: TableNormalizer> TableNormalizer for MetricsNormalizer<N> {
    fn normalize(&self, table: &RawTable) -> Result<NormalizedTable> {
        match self.inner.normalize(table) {
            Ok(normalized) => {
                metrics::normalize::rows_kept(self.inner.name(), normalized.records.len());
                for dropped in &normalized.report.dropped {
                    let column = dropped.column.as_deref().unwrap_or("record");
                    metrics::normalize::row_dropped(column, dropped.reason.kind());
                }
                metrics::normalize::batch_processed(table.len());
                Ok(normalized)
            }
            Err(e) => {
                let kind = match &e {
                    NormalizerError::Schema { .. } => "schema",
                    NormalizerError::EmptyResult { .. } => "empty_result",
                    _ => "other",
                };
                metrics::normalize::run_failed(kind);
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
