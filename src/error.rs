use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Schema error: missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Empty result: none of the {rows_read} input row(s) survived normalization")]
    EmptyResult { rows_read: usize },

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to coerce a single cell. These never abort a run; the row that
/// carries the cell is dropped and the failure lands in the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("value is missing")]
    Missing,

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("value {0} is not finite")]
    NotFinite(f64),

    #[error("value {0} is negative")]
    Negative(f64),

    #[error("price {0} falls outside every price bucket")]
    OutOfRange(f64),

    #[error("record could not be decoded: {0}")]
    Undecodable(String),
}

impl ParseError {
    /// Stable short name used for grouping drop counts and metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Missing => "missing",
            ParseError::InvalidNumber(_) => "invalid_number",
            ParseError::NotFinite(_) => "not_finite",
            ParseError::Negative(_) => "negative",
            ParseError::OutOfRange(_) => "out_of_range",
            ParseError::Undecodable(_) => "undecodable",
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizerError>;
