//! Cleaning and normalization of e-commerce listing spreadsheets.
//!
//! Reads one CSV of listings, coerces the quantity-sold and price columns to
//! numbers, derives a price bucket, and drops rows that cannot be cleaned.
//! The cleaned table is handed to whatever renders it.

pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::{Config, NormalizerConfig};
pub use domain::{CleanedRecord, PriceBucket};
pub use error::{NormalizerError, ParseError, Result};
pub use pipeline::normalize::{
    bucket_price, parse_price, parse_quantity, ListingNormalizer, NormalizedTable, TableNormalizer,
};
pub use pipeline::run_pipeline;
pub use types::{RawRecord, RawTable, RawValue};
