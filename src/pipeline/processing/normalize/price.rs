use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::types::RawValue;

/// Currency markers: "R$", "US$", a bare "$", or any other Unicode currency sign
static CURRENCY_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:R|US)?\$|\p{Sc}").expect("currency pattern is valid"));

/// What must be left once every step has run: an unsigned decimal
static PLAIN_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("decimal pattern is valid"));

/// Cleaning steps for Brazilian-formatted currency strings, applied in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStep {
    StripCurrencySymbol,
    StripWhitespace,
    StripThousandsSeparator,
    NormalizeDecimalSeparator,
}

pub const PRICE_STEPS: [PriceStep; 4] = [
    PriceStep::StripCurrencySymbol,
    PriceStep::StripWhitespace,
    PriceStep::StripThousandsSeparator,
    PriceStep::NormalizeDecimalSeparator,
];

impl PriceStep {
    pub fn name(&self) -> &'static str {
        match self {
            PriceStep::StripCurrencySymbol => "strip_currency_symbol",
            PriceStep::StripWhitespace => "strip_whitespace",
            PriceStep::StripThousandsSeparator => "strip_thousands_separator",
            PriceStep::NormalizeDecimalSeparator => "normalize_decimal_separator",
        }
    }

    pub fn apply(&self, input: &str) -> String {
        match self {
            PriceStep::StripCurrencySymbol => CURRENCY_SYMBOL.replace_all(input, "").into_owned(),
            // char::is_whitespace also covers the non-breaking space spreadsheets emit
            PriceStep::StripWhitespace => input.chars().filter(|c| !c.is_whitespace()).collect(),
            PriceStep::StripThousandsSeparator => input.replace('.', ""),
            PriceStep::NormalizeDecimalSeparator => input.replace(',', "."),
        }
    }
}

/// Run every price step over the text
pub fn clean_price_text(input: &str) -> String {
    PRICE_STEPS
        .iter()
        .fold(input.to_string(), |text, step| step.apply(&text))
}

/// Coerce a currency cell such as `"R$ 1.234,56"` into a float.
///
/// Numbers pass through unchanged. Text is rejected unless the cleaned
/// remainder is a plain unsigned decimal, so stray letters, signs and
/// exponents never sneak through `f64::from_str`.
pub fn parse_price(raw: &RawValue) -> Result<f64, ParseError> {
    let text = match raw {
        RawValue::Number(n) => return Ok(*n),
        RawValue::Missing => return Err(ParseError::Missing),
        RawValue::Text(s) => s,
    };

    let cleaned = clean_price_text(text);
    if cleaned.is_empty() {
        return Err(ParseError::Missing);
    }
    if !PLAIN_DECIMAL.is_match(&cleaned) {
        return Err(ParseError::InvalidNumber(text.clone()));
    }

    cleaned
        .parse()
        .map_err(|_| ParseError::InvalidNumber(text.clone()))
}
