use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Decimal places used when presenting money
pub const MONEY_SCALE: u32 = 2;

/// Parses a raw scale or money entry, degrading to zero
///
/// Absent, blank and non-numeric text all read as `0`, so a half-filled
/// weighbridge form still produces a result.
pub fn parse_lenient(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| {
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        })
        .unwrap_or(Decimal::ZERO)
}

/// A numeric form field exactly as the client sent it
///
/// Weighbridge clients send numbers, numeric strings, or whatever the
/// operator typed. Anything that is not a number reads as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl RawAmount {
    pub fn value(&self) -> Decimal {
        match self {
            RawAmount::Number(n) => parse_lenient(Some(&n.to_string())),
            RawAmount::Text(s) => parse_lenient(Some(s)),
            RawAmount::Other(_) => Decimal::ZERO,
        }
    }

    /// Value of an optional field, absent reading as zero
    pub fn value_of(raw: Option<&RawAmount>) -> Decimal {
        raw.map(RawAmount::value).unwrap_or(Decimal::ZERO)
    }
}

impl From<Decimal> for RawAmount {
    fn from(amount: Decimal) -> Self {
        RawAmount::Text(amount.to_string())
    }
}

impl From<i64> for RawAmount {
    fn from(amount: i64) -> Self {
        RawAmount::Number(amount.into())
    }
}

impl From<&str> for RawAmount {
    fn from(text: &str) -> Self {
        RawAmount::Text(text.to_string())
    }
}

/// Parses a decimal column read back from the store
pub fn parse_stored(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        AppError::internal(format!(
            "Invalid decimal in column {}: '{}' ({})",
            column, value, e
        ))
    })
}

/// Parses an optional decimal column read back from the store
pub fn parse_stored_opt(column: &str, value: Option<&str>) -> Result<Option<Decimal>> {
    value.map(|v| parse_stored(column, v)).transpose()
}

/// Canonical text form for persistence
pub fn to_stored(amount: Decimal) -> String {
    amount.normalize().to_string()
}

/// Formats money with two decimal places, e.g. `2250.00`
///
/// Halves round away from zero.
pub fn format_money(amount: Decimal) -> String {
    format!(
        "{:.width$}",
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        width = MONEY_SCALE as usize
    )
}
