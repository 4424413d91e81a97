/// Column name constants for the listings spreadsheet.
/// These are the defaults used when the configuration does not override them.

pub const QUANTITY_COLUMN: &str = "Qtd_Vendidos";
pub const PRICE_COLUMN: &str = "Preço";
pub const RATING_COLUMN: &str = "Nota";
pub const REVIEW_COUNT_COLUMN: &str = "N_Avaliações";
pub const CATEGORY_COLUMN: &str = "Categoria";
pub const MATERIAL_COLUMN: &str = "Material";

// Derived column added by the normalizer
pub const PRICE_BUCKET_COLUMN: &str = "Faixa_Preco";

/// Unit token meaning "thousand" in quantity cells such as "+10mil"
pub const THOUSAND_TOKEN: &str = "mil";
pub const THOUSAND_MULTIPLIER: f64 = 1000.0;

/// Cell spellings treated as missing during CSV ingestion (compared case-insensitively)
pub const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none"];

/// All default column names, in spreadsheet order
pub fn default_columns() -> Vec<&'static str> {
    vec![
        QUANTITY_COLUMN,
        PRICE_COLUMN,
        RATING_COLUMN,
        REVIEW_COUNT_COLUMN,
        CATEGORY_COLUMN,
        MATERIAL_COLUMN,
    ]
}
