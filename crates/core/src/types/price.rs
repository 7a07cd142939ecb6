//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are kept as [`Decimal`] so cart totals add up exactly; they only
//! become strings at the display edge via [`format_amount`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., lei, not bani).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display (e.g., "139.99 RON").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", format_amount(self.amount), self.currency_code)
    }
}

/// ISO 4217 currency codes the shop can price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    RON,
    EUR,
    USD,
}

impl CurrencyCode {
    /// The three-letter code shown next to amounts.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RON => "RON",
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unsupported currency code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RON" => Ok(Self::RON),
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Format an amount with exactly two decimal digits.
///
/// Midpoints round away from zero, so `0.005` becomes `"0.01"` and zero
/// becomes `"0.00"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_pads_to_two_digits() {
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
        assert_eq!(format_amount(Decimal::new(1999, 2)), "19.99");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::new(5, 3)), "0.01");
        assert_eq!(format_amount(Decimal::new(27_985, 3)), "27.99");
        assert_eq!(format_amount(Decimal::new(279_849, 4)), "27.98");
        assert_eq!(format_amount(Decimal::new(279_984, 4)), "28.00");
        assert_eq!(format_amount(Decimal::new(-5, 3)), "-0.01");
    }

    #[test]
    fn test_price_display() {
        let price = Price::new(Decimal::new(13_999, 2), CurrencyCode::RON);
        assert_eq!(price.display(), "139.99 RON");
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("ron".parse::<CurrencyCode>().unwrap(), CurrencyCode::RON);
        assert_eq!(" EUR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("BTC".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_price_amount_is_a_json_number() {
        let price = Price::new(Decimal::new(4950, 2), CurrencyCode::RON);
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json["amount"], serde_json::json!(49.5));
        assert_eq!(json["currency_code"], "RON");
    }
}
