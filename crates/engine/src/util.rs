//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation reports the same messages.

use chrono::NaiveDate;

use crate::{EngineError, Money, ResultEngine};

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Parse a calendar date (`YYYY-MM-DD`).
///
/// A trailing time component (`2024-03-01T00:00:00.000Z`) is ignored so
/// values echoed back by clients are accepted.
pub(crate) fn parse_date(value: &str, field: &str) -> ResultEngine<NaiveDate> {
    let date_part = value.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| {
        EngineError::validation(format!("{field} must be a valid date (YYYY-MM-DD)"))
    })
}

/// Parse a transaction amount: a decimal strictly greater than zero with at
/// most two fractional digits.
pub(crate) fn parse_positive_amount(value: &str) -> ResultEngine<Money> {
    let amount: Money = value.parse()?;
    if !amount.is_positive() {
        return Err(EngineError::validation("amount must be greater than 0"));
    }
    if amount > Money::MAX_AMOUNT {
        return Err(EngineError::validation(format!(
            "amount must not exceed {}",
            Money::MAX_AMOUNT
        )));
    }
    Ok(amount)
}
