use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// An untyped spreadsheet cell as ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "{}", s),
            RawValue::Missing => write!(f, ""),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&serde_json::Value> for RawValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Missing,
            serde_json::Value::String(s) => RawValue::Text(s.clone()),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(RawValue::Number)
                .unwrap_or_else(|| RawValue::Text(n.to_string())),
            other => RawValue::Text(other.to_string()),
        }
    }
}

/// One spreadsheet row as ingested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub fields: HashMap<String, RawValue>,
    /// 1-based line in the source file, when the row came from one
    pub line: Option<u64>,
    /// Set when the source record could not be decoded; such rows carry no cells
    pub decode_error: Option<String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A placeholder for a source record the reader could not decode
    pub fn undecodable(line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            line,
            decode_error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Look up a cell. A column that is absent from the row reads as missing.
    pub fn get(&self, column: &str) -> &RawValue {
        self.fields.get(column).unwrap_or(&RawValue::Missing)
    }

    /// Build a record from a JSON object; non-object values yield an empty record
    pub fn from_json(value: &serde_json::Value) -> Self {
        let fields = value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), RawValue::from(v)))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            fields,
            ..Self::default()
        }
    }
}

/// A raw record set: the header plus the rows in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from JSON objects. The column list is every key seen,
    /// in order of first appearance.
    pub fn from_json_rows(rows: &[serde_json::Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            if let Some(obj) = row.as_object() {
                for key in obj.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }
        let rows = rows.iter().map(RawRecord::from_json).collect();
        Self { columns, rows }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
