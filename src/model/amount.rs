//! Amount type for exact decimal currency math.
//!
//! Actual stores money as integer minor units (cents). `Amount` converts those
//! to decimal dollars once, at the ingestion boundary, and keeps all arithmetic
//! in `Decimal` so that summing many rows never accumulates float drift.

use crate::error::{Error, Result};
use format_num::format_num;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Represents a dollar amount.
///
/// Display formatting is fixed: two decimal places, comma thousands grouping,
/// `$` prefix, and the minus sign before the `$` for negative values.
///
/// # Examples
/// ```
/// # use actual_sheets::Amount;
/// assert_eq!(Amount::from_minor_units(14532).to_string(), "$145.32");
/// assert_eq!(Amount::from_minor_units(-575).to_string(), "-$5.75");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Converts integer minor units to dollars, e.g. `14532` -> `145.32`.
    pub fn from_minor_units(minor_units: i64) -> Self {
        Amount(Decimal::new(minor_units, 2))
    }

    /// Converts a JSON number of minor units, failing when the number is not
    /// integer-representable (e.g. the server sent `145.32` where `14532` was
    /// expected).
    pub fn from_json_number(number: &serde_json::Number) -> Result<Self> {
        let minor_units = number
            .as_i64()
            .ok_or_else(|| Error::InvalidAmount(number.to_string()))?;
        Ok(Self::from_minor_units(minor_units))
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}${}",
            format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
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
    use std::str::FromStr;

    #[test]
    fn test_from_minor_units() {
        let amount = Amount::from_minor_units(14532);
        assert_eq!(amount.value(), Decimal::from_str("145.32").unwrap());
    }

    #[test]
    fn test_from_minor_units_negative() {
        let amount = Amount::from_minor_units(-575);
        assert_eq!(amount.value(), Decimal::from_str("-5.75").unwrap());
    }

    #[test]
    fn test_from_minor_units_zero() {
        assert!(Amount::from_minor_units(0).is_zero());
    }

    #[test]
    fn test_from_json_number_integer() {
        let number = serde_json::Number::from(15000);
        let amount = Amount::from_json_number(&number).unwrap();
        assert_eq!(amount.value(), Decimal::from_str("150.00").unwrap());
    }

    #[test]
    fn test_from_json_number_fractional_is_invalid() {
        let number = serde_json::Number::from_f64(145.32).unwrap();
        let err = Amount::from_json_number(&number).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidAmount(_)));
    }

    #[test]
    fn test_display_positive() {
        assert_eq!(Amount::from_minor_units(14532).to_string(), "$145.32");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Amount::from_minor_units(-2345).to_string(), "-$23.45");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Amount::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_commas() {
        assert_eq!(Amount::from_minor_units(123456789).to_string(), "$1,234,567.89");
        assert_eq!(Amount::from_minor_units(-6000000).to_string(), "-$60,000.00");
    }

    #[test]
    fn test_sum_is_exact() {
        let cents = [15000i64, 5000, 50000, 20000];
        let total: Amount = cents.iter().map(|&c| Amount::from_minor_units(c)).sum();
        assert_eq!(total, Amount::from_minor_units(90000));
        assert_eq!(total.to_string(), "$900.00");
    }

    #[test]
    fn test_subtraction() {
        let budgeted = Amount::from_minor_units(20000);
        let actual = Amount::from_minor_units(18967);
        assert_eq!(budgeted - actual, Amount::from_minor_units(1033));
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::from_minor_units(-0).is_negative());
    }
}
