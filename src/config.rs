use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{NormalizerError, Result};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "LISTINGS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub columns: ColumnConfig,
    pub normalize: NormalizeSection,
    pub logging: LoggingConfig,
}

/// Where the listings CSV lives and how to read it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub delimiter: char,
    /// Turn cells that are plain decimals into numbers, like a dataframe loader would
    pub infer_numbers: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ecommerce_estatistica.csv"),
            delimiter: ',',
            infer_numbers: true,
        }
    }
}

/// Column names in the source sheet
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub quantity: String,
    pub price: String,
    pub rating: String,
    pub review_count: String,
    pub category: String,
    pub material: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            quantity: constants::QUANTITY_COLUMN.to_string(),
            price: constants::PRICE_COLUMN.to_string(),
            rating: constants::RATING_COLUMN.to_string(),
            review_count: constants::REVIEW_COUNT_COLUMN.to_string(),
            category: constants::CATEGORY_COLUMN.to_string(),
            material: constants::MATERIAL_COLUMN.to_string(),
        }
    }
}

impl ColumnConfig {
    /// Columns the normalizer coerces and can never do without
    pub fn core(&self) -> Vec<&str> {
        vec![self.quantity.as_str(), self.price.as_str()]
    }

    /// Descriptive columns read by the presentation layer
    pub fn descriptive(&self) -> Vec<&str> {
        vec![
            self.rating.as_str(),
            self.review_count.as_str(),
            self.category.as_str(),
            self.material.as_str(),
        ]
    }

    pub fn all(&self) -> Vec<&str> {
        let mut columns = self.core();
        columns.extend(self.descriptive());
        columns
    }

    /// The configured input name behind a default sheet column name.
    /// Names this config does not map come back unchanged.
    pub fn input_name<'a>(&'a self, default_name: &'a str) -> &'a str {
        match default_name {
            constants::QUANTITY_COLUMN => &self.quantity,
            constants::PRICE_COLUMN => &self.price,
            constants::RATING_COLUMN => &self.rating,
            constants::REVIEW_COUNT_COLUMN => &self.review_count,
            constants::CATEGORY_COLUMN => &self.category,
            constants::MATERIAL_COLUMN => &self.material,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeSection {
    /// When set, every descriptive column must be present in the header
    pub strict_schema: bool,
}

impl Default for NormalizeSection {
    fn default() -> Self {
        Self { strict_schema: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// Filter used when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "normalizer.log".to_string(),
            default_filter: "listings_normalizer=info".to_string(),
        }
    }
}

/// Settings for one normalizer instance
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    pub columns: ColumnConfig,
    pub strict_schema: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            columns: ColumnConfig::default(),
            strict_schema: true,
        }
    }
}

impl NormalizerConfig {
    /// Only quantity and price are required; descriptive columns are used if present
    pub fn lenient() -> Self {
        Self {
            strict_schema: false,
            ..Self::default()
        }
    }
}

impl Config {
    /// Load from the file named by `LISTINGS_CONFIG`, or `config.toml`
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(&config_path)
    }

    pub fn from_path(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            NormalizerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            columns: self.columns.clone(),
            strict_schema: self.normalize.strict_schema,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.input.delimiter.is_ascii() {
            return Err(NormalizerError::Config(format!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                self.input.delimiter
            )));
        }

        let columns = self.columns.all();
        if columns.iter().any(|c| c.trim().is_empty()) {
            return Err(NormalizerError::Config("Column names must not be empty".to_string()));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(NormalizerError::Config(format!(
                    "Column '{}' is mapped more than once",
                    column
                )));
            }
        }
        Ok(())
    }
}
