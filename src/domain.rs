use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ColumnConfig;
use crate::constants;
use crate::types::{RawRecord, RawValue};

/// Named price range used to categorize listings.
/// Variants are ordered from the cheapest bucket upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceBucket {
    UpTo50,
    From50To100,
    From100To200,
    From200To500,
    From500To1000,
    Over1000,
}

impl PriceBucket {
    /// The fixed bucket table, cheapest first
    pub const ALL: [PriceBucket; 6] = [
        PriceBucket::UpTo50,
        PriceBucket::From50To100,
        PriceBucket::From100To200,
        PriceBucket::From200To500,
        PriceBucket::From500To1000,
        PriceBucket::Over1000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::UpTo50 => "Até R$50",
            PriceBucket::From50To100 => "R$50–100",
            PriceBucket::From100To200 => "R$100–200",
            PriceBucket::From200To500 => "R$200–500",
            PriceBucket::From500To1000 => "R$500–1000",
            PriceBucket::Over1000 => "Mais de R$1000",
        }
    }

    /// Inclusive lower and exclusive upper bound. `None` means unbounded.
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            PriceBucket::UpTo50 => (0.0, Some(50.0)),
            PriceBucket::From50To100 => (50.0, Some(100.0)),
            PriceBucket::From100To200 => (100.0, Some(200.0)),
            PriceBucket::From200To500 => (200.0, Some(500.0)),
            PriceBucket::From500To1000 => (500.0, Some(1000.0)),
            PriceBucket::Over1000 => (1000.0, None),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        let (lower, upper) = self.bounds();
        price >= lower && upper.map_or(true, |upper| price < upper)
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PriceBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A listing after cleaning: numeric quantity and price, the derived price
/// bucket, and the descriptive columns the presentation layer reads.
///
/// Descriptive fields are `None` only when the column is absent from the
/// source table altogether; a blank cell in a present column drops the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    #[serde(rename = "Qtd_Vendidos")]
    pub quantity_sold: f64,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Faixa_Preco")]
    pub price_bucket: PriceBucket,
    #[serde(rename = "Nota", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(rename = "N_Avaliações", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<f64>,
    #[serde(rename = "Categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "Material", skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Columns the normalizer does not interpret, carried through as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, RawValue>,
    #[serde(skip)]
    pub line: Option<u64>,
}

impl CleanedRecord {
    /// Turn the record back into a raw row under the given input column names.
    /// Numeric fields stay numeric so a second normalization pass is a no-op.
    pub fn to_raw(&self, columns: &ColumnConfig) -> RawRecord {
        let mut record = RawRecord::new()
            .with_field(columns.quantity.as_str(), self.quantity_sold)
            .with_field(columns.price.as_str(), self.price)
            .with_field(constants::PRICE_BUCKET_COLUMN, self.price_bucket.label());

        if let Some(rating) = self.rating {
            record = record.with_field(columns.rating.as_str(), rating);
        }
        if let Some(reviews) = self.review_count {
            record = record.with_field(columns.review_count.as_str(), reviews);
        }
        if let Some(category) = &self.category {
            record = record.with_field(columns.category.as_str(), category.as_str());
        }
        if let Some(material) = &self.material {
            record = record.with_field(columns.material.as_str(), material.as_str());
        }
        for (column, value) in &self.extra {
            record.fields.insert(column.clone(), value.clone());
        }
        record.line = self.line;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_table_is_contiguous() {
        for pair in PriceBucket::ALL.windows(2) {
            let (_, upper) = pair[0].bounds();
            let (lower, _) = pair[1].bounds();
            assert_eq!(upper, Some(lower));
        }
        assert_eq!(PriceBucket::ALL[0].bounds().0, 0.0);
        assert_eq!(PriceBucket::ALL[5].bounds(), (1000.0, None));
    }

    #[test]
    fn test_contains_is_half_open() {
        assert!(PriceBucket::From200To500.contains(200.0));
        assert!(PriceBucket::From200To500.contains(499.99));
        assert!(!PriceBucket::From200To500.contains(500.0));
        assert!(PriceBucket::Over1000.contains(f64::MAX));
        assert!(!PriceBucket::UpTo50.contains(-0.01));
    }

    #[test]
    fn test_to_raw_uses_configured_names() {
        let columns = ColumnConfig {
            quantity: "sold".to_string(),
            ..ColumnConfig::default()
        };
        let record = CleanedRecord {
            quantity_sold: 3.0,
            price: 20.0,
            price_bucket: PriceBucket::UpTo50,
            rating: None,
            review_count: None,
            category: Some("Roupas".to_string()),
            material: None,
            extra: BTreeMap::new(),
            line: Some(4),
        };

        let raw = record.to_raw(&columns);
        assert_eq!(raw.get("sold"), &RawValue::Number(3.0));
        assert!(raw.get("Qtd_Vendidos").is_missing());
        assert_eq!(raw.get("Categoria").as_text(), Some("Roupas"));
        assert_eq!(raw.line, Some(4));
    }

    #[test]
    fn test_cleaned_record_serializes_with_sheet_column_names() {
        let record = CleanedRecord {
            quantity_sold: 2000.0,
            price: 99.9,
            price_bucket: PriceBucket::From50To100,
            rating: Some(4.5),
            review_count: None,
            category: Some("Roupas".to_string()),
            material: None,
            extra: BTreeMap::from([
                ("Marca".to_string(), RawValue::from("Marca A")),
                ("Desconto".to_string(), RawValue::Missing),
            ]),
            line: Some(2),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "Qtd_Vendidos": 2000.0,
                "Preço": 99.9,
                "Faixa_Preco": "R$50–100",
                "Nota": 4.5,
                "Categoria": "Roupas",
                "Marca": "Marca A",
                "Desconto": null
            })
        );
    }
}
