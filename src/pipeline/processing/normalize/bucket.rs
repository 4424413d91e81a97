use crate::domain::PriceBucket;
use crate::error::ParseError;

/// Place a price in the first bucket whose `[lower, upper)` range holds it.
/// Negative and non-finite prices belong to no bucket.
pub fn bucket_price(price: f64) -> Result<PriceBucket, ParseError> {
    if !price.is_finite() {
        return Err(ParseError::NotFinite(price));
    }

    PriceBucket::ALL
        .into_iter()
        .find(|bucket| bucket.contains(price))
        .ok_or(ParseError::OutOfRange(price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_edges() {
        assert_eq!(bucket_price(0.0).unwrap().label(), "Até R$50");
        assert_eq!(bucket_price(49.99).unwrap().label(), "Até R$50");
        assert_eq!(bucket_price(50.0).unwrap().label(), "R$50–100");
        assert_eq!(bucket_price(99.9).unwrap().label(), "R$50–100");
        assert_eq!(bucket_price(100.0).unwrap().label(), "R$100–200");
        assert_eq!(bucket_price(499.99).unwrap().label(), "R$200–500");
        assert_eq!(bucket_price(500.0).unwrap().label(), "R$500–1000");
        assert_eq!(bucket_price(1000.0).unwrap().label(), "Mais de R$1000");
        assert_eq!(bucket_price(1.0e9).unwrap(), PriceBucket::Over1000);
    }

    #[test]
    fn test_prices_outside_the_table() {
        assert_eq!(bucket_price(-0.01), Err(ParseError::OutOfRange(-0.01)));
        assert!(matches!(bucket_price(f64::NAN), Err(ParseError::NotFinite(_))));
        assert!(matches!(bucket_price(f64::INFINITY), Err(ParseError::NotFinite(_))));
    }
}
