use std::{fmt, str::FromStr};

use crate::{ValidationCode, ValidationError};

/// Largest storable amount: 12 digits with 2 of them after the separator.
const MAX_MINOR: i64 = 999_999_999_999;

/// Money amount represented as **integer minor units** (kopecks).
///
/// Records store amounts with exactly two fractional digits, so the engine
/// keeps them as integers to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_minor(500_00);
/// assert_eq!(amount.minor(), 50000);
/// assert_eq!(amount.to_string(), "500.00");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals instead of rounding):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().minor(), 1050);
/// assert!("100.005".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// The sign is kept: positivity is a business rule checked by the record
    /// validation, not a parse error.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `100.005`)
    /// - max 12 digits in total
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            |message: &str| ValidationError::new("amount", ValidationCode::InvalidAmount, message);

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(invalid("amount is required"));
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().unwrap_or_default();
        let fraction_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid("invalid amount"));
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("invalid amount"));
        }
        let units: i64 = units_str.parse().map_err(|_| invalid("amount too large"))?;

        let fraction: i64 = match fraction_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid("invalid amount"));
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid("invalid amount"))? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid("invalid amount"))?,
                    _ => {
                        return Err(invalid(
                            "amount must have at most 2 decimal places",
                        ));
                    }
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .filter(|v| *v <= MAX_MINOR)
            .ok_or_else(|| invalid("amount must have at most 12 digits"))?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_always_has_two_decimals() {
        assert_eq!(Amount::from_minor(0).to_string(), "0.00");
        assert_eq!(Amount::from_minor(1).to_string(), "0.01");
        assert_eq!(Amount::from_minor(10).to_string(), "0.10");
        assert_eq!(Amount::from_minor(50000).to_string(), "500.00");
        assert_eq!(Amount::from_minor(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().minor(), 1050);
        assert_eq!("0.01".parse::<Amount>().unwrap().minor(), 1);
        assert_eq!("+1.00".parse::<Amount>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().minor(), 230);
        assert_eq!("5.".parse::<Amount>().unwrap().minor(), 500);
    }

    #[test]
    fn parse_keeps_sign_for_business_validation() {
        let amount = "-0.01".parse::<Amount>().unwrap();
        assert_eq!(amount.minor(), -1);
        assert!(!amount.is_positive());
        assert!(!"0".parse::<Amount>().unwrap().is_positive());
    }

    #[test]
    fn parse_rejects_precision_loss() {
        let err = "100.005".parse::<Amount>().unwrap_err();
        assert_eq!(err.code, ValidationCode::InvalidAmount);
        assert_eq!(err.field, "amount");
        assert!("0.001".parse::<Amount>().is_err());
    }

    #[test]
    fn parse_enforces_twelve_digits() {
        assert_eq!(
            "9999999999.99".parse::<Amount>().unwrap().minor(),
            999_999_999_999
        );
        assert!("10000000000".parse::<Amount>().is_err());
        assert!("99999999999999999999999".parse::<Amount>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "  ", "-", "abc", "1.2.3", ".50", "1e5", "12,3a"] {
            assert!(input.parse::<Amount>().is_err(), "{input:?} should fail");
        }
    }
}
