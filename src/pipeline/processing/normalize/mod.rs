//! Normalization of raw listing rows into analysis-ready records.
//!
//! Quantity and price cells are coerced through explicit step sequences
//! (`quantity`, `price`), the price is placed in a bucket (`bucket`), and
//! any row that fails is dropped and recorded in the run's report.

pub mod base;
pub mod bucket;
pub mod price;
pub mod quantity;
pub mod report;

use std::collections::BTreeMap;
use tracing::{debug, info, info_span, warn};

use crate::config::{ColumnConfig, NormalizerConfig};
use crate::constants;
use crate::domain::{CleanedRecord, PriceBucket};
use crate::error::{NormalizerError, ParseError, Result};
use crate::types::{RawRecord, RawTable, RawValue};

pub use base::{MetricsNormalizer, TableNormalizer};
pub use bucket::bucket_price;
pub use price::{clean_price_text, parse_price, PriceStep, PRICE_STEPS};
pub use quantity::{clean_quantity_text, parse_quantity, QuantityStep, QUANTITY_STEPS};
pub use report::{DroppedRow, NormalizationReport};

/// Output of a successful run: surviving rows in input order plus the report
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    /// Output column names, using the default sheet names
    pub columns: Vec<String>,
    pub records: Vec<CleanedRecord>,
    pub report: NormalizationReport,
    /// Input column names the table was read with
    pub source_columns: ColumnConfig,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert back to a raw table under the input column names the table
    /// was read with, keeping numeric cells numeric
    pub fn to_raw_table(&self) -> RawTable {
        let columns = self
            .columns
            .iter()
            .map(|c| self.source_columns.input_name(c).to_string())
            .collect();
        let rows = self
            .records
            .iter()
            .map(|r| r.to_raw(&self.source_columns))
            .collect();
        RawTable::new(columns, rows)
    }

    /// Total quantity sold per category. Records without a category are left out.
    pub fn totals_by_category(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            if let Some(category) = &record.category {
                *totals.entry(category.clone()).or_insert(0.0) += record.quantity_sold;
            }
        }
        totals
    }

    /// Total quantity sold per price bucket
    pub fn totals_by_price_bucket(&self) -> BTreeMap<PriceBucket, f64> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.price_bucket).or_insert(0.0) += record.quantity_sold;
        }
        totals
    }
}

/// Which descriptive columns the input table actually carries
#[derive(Debug, Clone, Copy, Default)]
struct PresentColumns {
    rating: bool,
    review_count: bool,
    category: bool,
    material: bool,
}

/// Row failure: the column that broke, if any, and why
type RowFailure = (Option<String>, ParseError);

/// The listings normalizer, parameterized by column names and schema strictness
#[derive(Debug, Clone, Default)]
pub struct ListingNormalizer {
    config: NormalizerConfig,
}

impl ListingNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Fail with a schema error when a required column is not in the header
    fn check_schema(&self, table: &RawTable) -> Result<PresentColumns> {
        let columns = &self.config.columns;
        let mut required = columns.core();
        if self.config.strict_schema {
            required.extend(columns.descriptive());
        }

        let missing: Vec<String> = required
            .into_iter()
            .filter(|c| !table.has_column(c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(NormalizerError::Schema { missing });
        }

        Ok(PresentColumns {
            rating: table.has_column(&columns.rating),
            review_count: table.has_column(&columns.review_count),
            category: table.has_column(&columns.category),
            material: table.has_column(&columns.material),
        })
    }

    /// Header columns the normalizer does not interpret
    fn extra_columns<'a>(&self, table: &'a RawTable) -> Vec<&'a str> {
        let known = self.config.columns.all();
        table
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| !known.contains(c) && *c != constants::PRICE_BUCKET_COLUMN)
            .collect()
    }

    fn output_columns(&self, present: PresentColumns, extras: &[&str]) -> Vec<String> {
        let mut columns = vec![
            constants::QUANTITY_COLUMN.to_string(),
            constants::PRICE_COLUMN.to_string(),
        ];
        let descriptive = [
            (present.rating, constants::RATING_COLUMN),
            (present.review_count, constants::REVIEW_COUNT_COLUMN),
            (present.category, constants::CATEGORY_COLUMN),
            (present.material, constants::MATERIAL_COLUMN),
        ];
        columns.extend(
            descriptive
                .iter()
                .filter(|(present, _)| *present)
                .map(|(_, name)| name.to_string()),
        );
        columns.extend(extras.iter().map(|c| c.to_string()));
        columns.push(constants::PRICE_BUCKET_COLUMN.to_string());
        columns
    }

    fn normalize_row(
        &self,
        row: &RawRecord,
        present: PresentColumns,
        extras: &[&str],
    ) -> std::result::Result<CleanedRecord, RowFailure> {
        if let Some(message) = &row.decode_error {
            return Err((None, ParseError::Undecodable(message.clone())));
        }
        let columns = &self.config.columns;

        let quantity_sold = parse_quantity(row.get(&columns.quantity))
            .and_then(ensure_non_negative)
            .map_err(failed_at(&columns.quantity))?;
        let price = parse_price(row.get(&columns.price)).map_err(failed_at(&columns.price))?;
        let price_bucket = bucket_price(price).map_err(failed_at(&columns.price))?;

        let rating = present
            .rating
            .then(|| coerce_number(row.get(&columns.rating)).map_err(failed_at(&columns.rating)))
            .transpose()?;
        let review_count = present
            .review_count
            .then(|| {
                coerce_number(row.get(&columns.review_count))
                    .and_then(ensure_non_negative)
                    .map_err(failed_at(&columns.review_count))
            })
            .transpose()?;
        let category = present
            .category
            .then(|| coerce_label(row.get(&columns.category)).map_err(failed_at(&columns.category)))
            .transpose()?;
        let material = present
            .material
            .then(|| coerce_label(row.get(&columns.material)).map_err(failed_at(&columns.material)))
            .transpose()?;

        let extra: BTreeMap<String, RawValue> = extras
            .iter()
            .map(|c| (c.to_string(), row.get(c).clone()))
            .collect();

        Ok(CleanedRecord {
            quantity_sold,
            price,
            price_bucket,
            rating,
            review_count,
            category,
            material,
            extra,
            line: row.line,
        })
    }
}

impl TableNormalizer for ListingNormalizer {
    fn normalize(&self, table: &RawTable) -> Result<NormalizedTable> {
        let present = self.check_schema(table)?;
        let extras = self.extra_columns(table);

        let mut report = NormalizationReport::new(table.len());
        let span = info_span!("normalize", run_id = %report.run_id, rows = table.len());
        let _enter = span.enter();

        let mut records = Vec::with_capacity(table.len());
        for (index, row) in table.rows.iter().enumerate() {
            match self.normalize_row(row, present, &extras) {
                Ok(record) => records.push(record),
                Err((column, reason)) => {
                    debug!(index, line = ?row.line, column = ?column, "Dropping row: {}", reason);
                    report.dropped.push(DroppedRow {
                        index,
                        line: row.line,
                        column,
                        reason,
                    });
                }
            }
        }
        report.rows_kept = records.len();

        if records.is_empty() {
            warn!("No rows survived normalization ({} read)", report.rows_read);
            return Err(NormalizerError::EmptyResult {
                rows_read: report.rows_read,
            });
        }

        if !report.dropped.is_empty() {
            warn!(
                "Dropped {} of {} rows during normalization",
                report.rows_dropped(),
                report.rows_read
            );
        }
        info!(
            "✅ Normalized {} rows ({} dropped)",
            report.rows_kept,
            report.rows_dropped()
        );

        Ok(NormalizedTable {
            columns: self.output_columns(present, &extras),
            records,
            report,
            source_columns: self.config.columns.clone(),
        })
    }

    fn name(&self) -> &str {
        "listing"
    }
}

fn failed_at(column: &str) -> impl Fn(ParseError) -> RowFailure + '_ {
    move |e| (Some(column.to_string()), e)
}

fn ensure_non_negative(value: f64) -> std::result::Result<f64, ParseError> {
    if !value.is_finite() {
        Err(ParseError::NotFinite(value))
    } else if value < 0.0 {
        Err(ParseError::Negative(value))
    } else {
        Ok(value)
    }
}

/// Ratings and review counts: numbers pass through, text may use either decimal separator
fn coerce_number(raw: &RawValue) -> std::result::Result<f64, ParseError> {
    let value: f64 = match raw {
        RawValue::Number(n) => *n,
        RawValue::Missing => return Err(ParseError::Missing),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ParseError::Missing);
            }
            trimmed
                .replace(',', ".")
                .parse()
                .map_err(|_| ParseError::InvalidNumber(s.clone()))?
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::NotFinite(value))
    }
}

fn coerce_label(raw: &RawValue) -> std::result::Result<String, ParseError> {
    match raw {
        RawValue::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        RawValue::Number(n) => Ok(n.to_string()),
        _ => Err(ParseError::Missing),
    }
}
