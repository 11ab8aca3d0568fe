//! Deserializers that coerce malformed values instead of failing.

use serde::{Deserialize, Deserializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::model::TransactionKind;

pub(crate) const ISO_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]");

/// Coerce a JSON value to an amount.
///
/// Numbers pass through, numeric strings are parsed, anything else
/// (including NaN and infinity) becomes zero.
pub(super) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.map(|value| coerce_amount(&value)).unwrap_or(0.0))
}

pub(crate) fn coerce_amount(value: &serde_json::Value) -> f64 {
    let amount = match value {
        serde_json::Value::Number(number) => number.as_f64().unwrap_or(0.0),
        serde_json::Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if amount.is_finite() { amount } else { 0.0 }
}

/// Parse the day-precision part of a date string.
///
/// Only the first ten characters are used, so `"2024-03-01T10:00:00Z"` and
/// `"2024-03-01"` give the same date. Unparsable or missing dates are `None`.
pub(super) fn date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(text)) => parse_day(&text),
        _ => None,
    })
}

pub(crate) fn parse_day(text: &str) -> Option<Date> {
    let day = text.get(..10)?;

    Date::parse(day, ISO_DATE_FORMAT).ok()
}

/// Read a category kind, treating unknown values as missing.
pub(super) fn kind<'de, D>(deserializer: D) -> Result<Option<TransactionKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(text)) => text.parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{coerce_amount, parse_day};

    #[test]
    fn coerces_amounts() {
        assert_eq!(coerce_amount(&json!(12.5)), 12.5);
        assert_eq!(coerce_amount(&json!("12.5")), 12.5);
        assert_eq!(coerce_amount(&json!(" 7 ")), 7.0);
        assert_eq!(coerce_amount(&json!("abc")), 0.0);
        assert_eq!(coerce_amount(&json!(null)), 0.0);
        assert_eq!(coerce_amount(&json!({"value": 1})), 0.0);
        assert_eq!(coerce_amount(&json!("NaN")), 0.0);
        assert_eq!(coerce_amount(&json!("inf")), 0.0);
    }

    #[test]
    fn parses_day_prefix() {
        assert_eq!(parse_day("2024-03-01"), Some(date!(2024 - 03 - 01)));
        assert_eq!(
            parse_day("2024-03-01T23:59:59.000Z"),
            Some(date!(2024 - 03 - 01))
        );
        assert_eq!(parse_day("2024-3-1"), None);
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day(""), None);
    }
}
