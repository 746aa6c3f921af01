//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal` so that sums over many small
//! transactions never drift the way binary floating point would. It parses what people type into
//! a form field: an optional currency symbol, optional thousands separators, and a decimal value.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Currency symbols that are accepted, and discarded, when parsing. There is only one currency.
const CURRENCY_SYMBOLS: &[char] = &['$', '₹'];

/// The largest magnitude a transaction amount or budget limit may have.
const MAX_WHOLE: u64 = 1_000_000_000_000_000;

/// The most decimal places a transaction amount or budget limit may have.
const MAX_SCALE: u32 = 2;

/// Represents a quantity of money.
///
/// # Examples
///
/// ```
/// # use budget_buddy::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₹1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1,250.50");
/// ```
///
/// Serialization keeps the exact decimal value:
/// ```
/// # use budget_buddy::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$0.10").unwrap();
/// assert_eq!(serde_json::to_string(&amount).unwrap(), "\"0.10\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// True when the magnitude is at most 10^15 and there are no more than two significant
    /// decimal places. Sums and ratios of such amounts stay far inside `Decimal`'s range.
    pub fn is_within_bounds(&self) -> bool {
        self.0.abs() <= Decimal::from(MAX_WHOLE) && self.0.normalize().scale() <= MAX_SCALE
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub enum AmountError {
    Empty,
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "Empty"),
            AmountError::Decimal(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "An amount is required"),
            AmountError::Decimal(e) => write!(f, "Invalid amount: {e}"),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AmountError::Empty => None,
            AmountError::Decimal(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };
        let digits: String = unsigned
            .trim_start_matches(CURRENCY_SYMBOLS)
            .chars()
            .filter(|c| *c != ',')
            .collect();
        if digits.is_empty() {
            return Err(AmountError::Empty);
        }

        let value = Decimal::from_str(&digits).map_err(AmountError::Decimal)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.abs().round_dp(2);
        write!(
            f,
            "{sign}{}",
            format_num::format_num!(",.2", abs.to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_with_symbols_and_commas() {
        assert_eq!(Amount::from_str("$1,000").unwrap().value(), dec("1000"));
        assert_eq!(
            Amount::from_str(" ₹1,234,567.89 ").unwrap().value(),
            dec("1234567.89")
        );
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-$50.25").unwrap();
        assert_eq!(amount.value(), dec("-50.25"));
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(Amount::from_str(""), Err(AmountError::Empty)));
        assert!(matches!(Amount::from_str(" $ "), Err(AmountError::Empty)));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = Amount::from_str("twelve").unwrap_err();
        assert!(err.to_string().starts_with("Invalid amount"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("1234.5")).to_string(), "1,234.50");
        assert_eq!(Amount::new(dec("-60000")).to_string(), "-60,000.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_sign_predicates() {
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
        assert!(Amount::new(dec("0.01")).is_positive());
    }

    #[test]
    fn test_serde_keeps_precision() {
        let amount = Amount::new(dec("19.995"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"19.995\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_many_small_amounts_do_not_drift() {
        let cent = Amount::from_str("0.10").unwrap();
        let total: Decimal = std::iter::repeat(cent.value()).take(1000).sum();
        assert_eq!(total, dec("100.00"));
    }

    #[test]
    fn test_within_bounds() {
        assert!(Amount::from_str("1,000,000,000,000,000").unwrap().is_within_bounds());
        assert!(Amount::from_str("12.50").unwrap().is_within_bounds());
        assert!(Amount::from_str("12.5000").unwrap().is_within_bounds());
        assert!(!Amount::from_str("1,000,000,000,000,000.01").unwrap().is_within_bounds());
        assert!(!Amount::from_str("0.001").unwrap().is_within_bounds());
        assert!(!Amount::from_str("-100000000000000000000").unwrap().is_within_bounds());
    }
}
