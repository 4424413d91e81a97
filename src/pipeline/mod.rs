// Data processing pipeline: read one listings sheet, produce one cleaned table

pub mod ingestion;
pub mod processing;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use ingestion::CsvOptions;
use processing::normalize::{ListingNormalizer, MetricsNormalizer, NormalizedTable, TableNormalizer};

// Re-export key types and functions from each stage
pub use processing::normalize;

/// Read the configured CSV and normalize it
pub fn run_pipeline(config: &Config) -> Result<NormalizedTable> {
    let options = CsvOptions::try_from(&config.input)?;
    let raw = ingestion::read_csv_file(&config.input.path, &options)?;

    let normalizer = MetricsNormalizer::new(ListingNormalizer::new(config.normalizer_config()));
    let normalized = normalizer.normalize(&raw)?;

    info!(
        run_id = %normalized.report.run_id,
        "🚀 Pipeline finished: {} of {} rows kept",
        normalized.report.rows_kept,
        normalized.report.rows_read
    );
    Ok(normalized)
}
