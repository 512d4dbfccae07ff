use std::{
    fmt,
    ops::Sub,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, summary totals, balances) to avoid floating-point drift. The
/// ledger is currency-agnostic: every amount has exactly two fractional
/// digits and fits a `DECIMAL(10,2)` column.
///
/// Stored transaction amounts are always positive; the sign of a balance is
/// only produced by the summary (`income - expense`).
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single transaction may carry (`99999999.99`).
    pub const MAX_AMOUNT: Money = Money(9_999_999_999);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Major-unit value for JSON output.
    ///
    /// Only used at the wire boundary; arithmetic stays on minor units.
    #[must_use]
    pub fn to_major_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::validation("amount must be a valid number");
        let overflow = || EngineError::validation("amount is too large");

        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(invalid());
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        // ".5" is accepted as "0.5".
        let units: i64 = if units_str.is_empty() {
            if cents_str.is_none_or(str::is_empty) {
                return Err(invalid());
            }
            0
        } else {
            if !units_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            units_str.parse().map_err(|_| overflow())?
        };

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => {
                        return Err(EngineError::validation(
                            "amount must have at most 2 decimal places",
                        ));
                    }
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
        assert_eq!(".5".parse::<Money>().unwrap().minor(), 50);
        assert_eq!("7.".parse::<Money>().unwrap().minor(), 700);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert_eq!(
            "12.345".parse::<Money>(),
            Err(EngineError::validation(
                "amount must have at most 2 decimal places"
            ))
        );
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", " ", "-", ".", "abc", "1.2.3", "1e5", "12a"] {
            assert_eq!(
                input.parse::<Money>(),
                Err(EngineError::validation("amount must be a valid number")),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn balance_can_go_negative() {
        let balance = Money::new(1000) - Money::new(2550);
        assert_eq!(balance.minor(), -1550);
        assert_eq!(balance.to_string(), "-15.50");
        assert_eq!(balance.to_major_f64(), -15.5);
    }
}
