use crate::constants::{THOUSAND_MULTIPLIER, THOUSAND_TOKEN};
use crate::error::ParseError;
use crate::types::RawValue;

/// Cleaning steps applied to quantity text, in order, before the unit token
/// is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityStep {
    Trim,
    StripPlusSign,
    CaseFold,
}

pub const QUANTITY_STEPS: [QuantityStep; 3] = [
    QuantityStep::Trim,
    QuantityStep::StripPlusSign,
    QuantityStep::CaseFold,
];

impl QuantityStep {
    pub fn name(&self) -> &'static str {
        match self {
            QuantityStep::Trim => "trim",
            QuantityStep::StripPlusSign => "strip_plus_sign",
            QuantityStep::CaseFold => "case_fold",
        }
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            QuantityStep::Trim => input.trim().to_string(),
            QuantityStep::StripPlusSign => input.strip_prefix('+').unwrap_or(input).to_string(),
            QuantityStep::CaseFold => input.to_lowercase(),
        }
    }
}

/// Run every quantity step over the text
pub fn clean_quantity_text(input: &str) -> String {
    QUANTITY_STEPS
        .iter()
        .fold(input.to_string(), |text, step| step.apply(&text))
}

/// Coerce a "quantity sold" cell such as `"+10mil"`, `"250"` or `"1.5mil"`.
///
/// Numbers pass through unchanged. Text containing `mil` is read as
/// thousands; anything else must parse as a plain float.
pub fn parse_quantity(raw: &RawValue) -> Result<f64, ParseError> {
    let text = match raw {
        RawValue::Number(n) => return Ok(*n),
        RawValue::Missing => return Err(ParseError::Missing),
        RawValue::Text(s) => s,
    };

    let cleaned = clean_quantity_text(text);
    if cleaned.is_empty() {
        return Err(ParseError::Missing);
    }

    let (remainder, multiplier) = if cleaned.contains(THOUSAND_TOKEN) {
        (cleaned.replace(THOUSAND_TOKEN, ""), THOUSAND_MULTIPLIER)
    } else {
        (cleaned, 1.0)
    };

    let remainder = remainder.trim();
    let value: f64 = remainder
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.clone()))?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite(value));
    }

    Ok(value * multiplier)
}
