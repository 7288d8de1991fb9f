//! Monetary types for the storefront.
//!
//! Amounts are fixed-point: a signed count of whole `units` plus a signed
//! count of `nanos` (10^-9 units). Both fields always carry the same sign
//! and `|nanos| < 1_000_000_000`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MonetaryError;

/// Number of nanos in one whole unit.
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A fixed-point monetary amount tagged with a currency.
///
/// Serializes with the catalog's field names
/// (`{"currencyCode":"USD","units":19,"nanos":990000000}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawMoney")]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency_code: Currency,
    /// Whole units of the amount.
    pub units: i64,
    /// Fractional units scaled by 10^9.
    pub nanos: i32,
}

/// Wire form of [`Money`] before normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMoney {
    currency_code: Currency,
    #[serde(default)]
    units: i64,
    #[serde(default)]
    nanos: i64,
}

impl From<RawMoney> for Money {
    fn from(raw: RawMoney) -> Self {
        Money::from_parts(raw.currency_code, raw.units, raw.nanos)
    }
}

impl Money {
    /// Create a money value from its parts, carrying excess nanos into units
    /// and aligning the signs of both fields.
    pub fn from_parts(currency_code: Currency, units: i64, nanos: i64) -> Self {
        let mut units = units.saturating_add(nanos / NANOS_PER_UNIT);
        let mut nanos = nanos % NANOS_PER_UNIT;

        if units > 0 && nanos < 0 {
            units -= 1;
            nanos += NANOS_PER_UNIT;
        } else if units < 0 && nanos > 0 {
            units += 1;
            nanos -= NANOS_PER_UNIT;
        }

        Self {
            currency_code,
            units,
            // |nanos| < 10^9 after the modulo, so this always fits.
            nanos: nanos as i32,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency_code: Currency) -> Self {
        Self {
            currency_code,
            units: 0,
            nanos: 0,
        }
    }

    /// Split a decimal amount into whole units and nanos.
    ///
    /// Digits below nano resolution are truncated.
    pub fn from_decimal(amount: Decimal, currency_code: Currency) -> Result<Self, MonetaryError> {
        let units = amount
            .trunc()
            .to_i64()
            .ok_or_else(|| MonetaryError::OutOfRange(amount.to_string()))?;
        let nanos = (amount.fract() * Decimal::from(NANOS_PER_UNIT))
            .trunc()
            .to_i64()
            .ok_or_else(|| MonetaryError::OutOfRange(amount.to_string()))?;

        Ok(Self::from_parts(currency_code, units, nanos))
    }

    /// Split a floating-point amount into whole units and nanos.
    pub fn from_f64(amount: f64, currency_code: Currency) -> Result<Self, MonetaryError> {
        let decimal = Decimal::try_from(amount)
            .map_err(|_| MonetaryError::OutOfRange(amount.to_string()))?;
        Self::from_decimal(decimal, currency_code)
    }

    /// Parse a decimal string such as `"19.99"`.
    pub fn parse(value: &str, currency_code: Currency) -> Result<Self, MonetaryError> {
        let amount: Decimal = value
            .trim()
            .parse()
            .map_err(|_| MonetaryError::InvalidAmount(value.to_string()))?;
        Self::from_decimal(amount, currency_code)
    }

    /// Recombine units and nanos into a single decimal.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(i64::from(self.nanos), 9)
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.units < 0 || self.nanos < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = (self.nanos / 10_000_000).unsigned_abs();
        write!(
            f,
            "{} {}{}.{:02}",
            self.currency_code,
            sign,
            self.units.unsigned_abs(),
            cents
        )
    }
}
