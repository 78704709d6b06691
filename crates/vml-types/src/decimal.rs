//! Decimal and quantity text encoding.
//!
//! Balances, amounts and percentages are `f64` values stored as base-10 text.
//! [`format_decimal`] writes the shortest representation that parses back to
//! the identical `f64`, without exponent notation, so every stored balance
//! round-trips through [`parse_decimal`]. Stock counts are signed integers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Parse a finite decimal number.
///
/// `field` names the argument in the error (e.g. `"amount"`).
pub fn parse_decimal(field: &'static str, value: &str) -> Result<f64, TypeError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TypeError::InvalidNumericFormat {
            field,
            value: value.to_string(),
        }),
    }
}

/// Canonical decimal text for a stored value.
///
/// # Examples
///
/// ```
/// use vml_types::format_decimal;
///
/// assert_eq!(format_decimal(70.0), "70");
/// assert_eq!(format_decimal(0.1), "0.1");
/// assert_eq!(format_decimal(-2.5), "-2.5");
/// ```
pub fn format_decimal(value: f64) -> String {
    format!("{value}")
}

/// Parse a signed integer quantity (stock count or delta).
pub fn parse_quantity(field: &'static str, value: &str) -> Result<i64, TypeError> {
    value
        .parse::<i64>()
        .map_err(|_| TypeError::InvalidNumericFormat {
            field,
            value: value.to_string(),
        })
}

/// Share of a transaction amount credited to a CSP or supplier account.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.0);

    /// Wrap a share, rejecting values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(TypeError::OutOfRange {
                field: "percentage",
                value: format_decimal(value),
                reason: "must be between 0 and 1".into(),
            });
        }
        Ok(Self(value))
    }

    /// Parse a percentage from decimal text.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        Self::new(parse_decimal("percentage", value)?)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The portion of `amount` this percentage represents.
    pub fn share_of(self, amount: f64) -> f64 {
        amount * self.0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_decimal(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_decimal("amount", "100").unwrap(), 100.0);
        assert_eq!(parse_decimal("amount", "0.10").unwrap(), 0.1);
        assert_eq!(parse_decimal("amount", "-3.25").unwrap(), -3.25);
        assert_eq!(parse_decimal("amount", "1e3").unwrap(), 1000.0);
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        for bad in ["", "abc", "1,5", "NaN", "inf", "-infinity", "1.2.3"] {
            let err = parse_decimal("amount", bad).unwrap_err();
            assert!(
                matches!(err, TypeError::InvalidNumericFormat { field: "amount", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn formats_without_exponent() {
        assert_eq!(format_decimal(100.0), "100");
        assert_eq!(format_decimal(10.5), "10.5");
        assert_eq!(format_decimal(1e21), "1000000000000000000000");
        assert_eq!(format_decimal(1e-7), "0.0000001");
    }

    #[test]
    fn quantities_accept_sign() {
        assert_eq!(parse_quantity("quantity", "5").unwrap(), 5);
        assert_eq!(parse_quantity("quantity", "-5").unwrap(), -5);
        assert_eq!(parse_quantity("quantity", "+7").unwrap(), 7);
        assert!(parse_quantity("quantity", "1.5").is_err());
        assert!(parse_quantity("quantity", "").is_err());
    }

    #[test]
    fn percentage_bounds() {
        assert_eq!(Percentage::parse("0.1").unwrap().value(), 0.1);
        assert!(Percentage::parse("0").is_ok());
        assert!(Percentage::parse("1").is_ok());
        assert!(matches!(
            Percentage::parse("1.01").unwrap_err(),
            TypeError::OutOfRange { .. }
        ));
        assert!(Percentage::parse("-0.2").is_err());
        assert!(matches!(
            Percentage::parse("ten").unwrap_err(),
            TypeError::InvalidNumericFormat { .. }
        ));
    }

    #[test]
    fn percentage_share() {
        let p = Percentage::parse("0.2").unwrap();
        assert_eq!(p.share_of(100.0), 20.0);
        assert_eq!(Percentage::ZERO.share_of(42.0), 0.0);
    }

    proptest! {
        #[test]
        fn decimal_text_roundtrips(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let text = format_decimal(v);
            prop_assert!(!text.contains('e'));
            prop_assert_eq!(parse_decimal("balance", &text).unwrap(), v);
        }

        #[test]
        fn quantity_text_roundtrips(q in any::<i64>()) {
            prop_assert_eq!(parse_quantity("quantity", &q.to_string()).unwrap(), q);
        }
    }
}
