//! Fixed-point monetary amount with 2 decimal places.
//!
//! Norma 43 carries every monetary field as an unsigned digit string with two
//! implied fraction digits plus a separate sign flag. `Amount` wraps
//! `rust_decimal` so that running balances are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg};
use std::str::FromStr;

/// Sign flag value marking a credit (positive) amount; anything else is a debit.
pub const POSITIVE_SIGN_FLAG: u8 = b'2';

/// A decimal type that maintains exactly 2 decimal places of precision.
///
/// # Examples
///
/// ```
/// use norma43::Amount;
///
/// let amount = Amount::from_cents(246343);
/// assert_eq!(amount.to_string(), "2463.43");
/// assert_eq!(amount.with_sign_flag(b'1').to_string(), "-2463.43");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount` from a `Decimal`, normalizing to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Interprets `cents` as a value with two implied fraction digits.
    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, Self::SCALE))
    }

    /// Interprets `units` as a whole value, without implied fraction digits.
    pub fn from_units(units: i64) -> Self {
        Amount::new(Decimal::from(units))
    }

    /// Applies a Norma 43 sign flag: `'2'` keeps the magnitude, any other
    /// byte negates it. Zero is never negated.
    pub fn with_sign_flag(self, flag: u8) -> Self {
        if flag == POSITIVE_SIGN_FLAG || self.is_zero() {
            self
        } else {
            -self
        }
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_applies_implied_fraction_digits() {
        assert_eq!(Amount::from_cents(246343).to_string(), "2463.43");
        assert_eq!(Amount::from_cents(100).to_string(), "1.00");
        assert_eq!(Amount::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_from_units_keeps_whole_value() {
        assert_eq!(Amount::from_units(50000).to_string(), "50000.00");
    }

    #[test]
    fn test_sign_flag() {
        let magnitude = Amount::from_cents(2399);
        assert_eq!(magnitude.with_sign_flag(b'2').to_string(), "23.99");
        assert_eq!(magnitude.with_sign_flag(b'1').to_string(), "-23.99");
        assert_eq!(magnitude.with_sign_flag(b'X').to_string(), "-23.99");
    }

    #[test]
    fn test_zero_is_never_negated() {
        let zero = Amount::ZERO.with_sign_flag(b'1');
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(!zero.is_positive());
    }

    #[test]
    fn test_addition_is_exact() {
        let mut balance = Amount::from_cents(246343);
        balance += Amount::from_cents(-2399);
        assert_eq!(balance, Amount::from_str("2439.44").unwrap());

        let sum = Amount::from_cents(10) + Amount::from_cents(20);
        assert_eq!(sum.to_string(), "0.30");
    }

    #[test]
    fn test_from_str_normalizes_scale() {
        assert_eq!(Amount::from_str(" 2.5 ").unwrap().to_string(), "2.50");
    }
}
