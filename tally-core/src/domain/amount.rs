//! Monetary amount decoding and display
//!
//! The backend sends amounts as JSON numbers. They are decoded through the
//! shortest textual form of the number (`1000.005`, not the binary expansion
//! of the nearest double) so that rounding for display behaves the way a
//! reader of the JSON would expect.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Currency prefix used for display
pub const CURRENCY_PREFIX: &str = "$";

fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

fn decimal_from_value<E: serde::de::Error>(value: JsonValue) -> Result<Decimal, E> {
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            parse_decimal(&s).ok_or_else(|| E::custom(format!("invalid decimal: {}", s)))
        }
        JsonValue::String(s) => {
            parse_decimal(s.trim()).ok_or_else(|| E::custom(format!("invalid decimal: {}", s)))
        }
        _ => Err(E::custom("expected number or string for amount")),
    }
}

/// Deserialize an amount that can be a number or a string
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    decimal_from_value(value)
}

/// Deserialize an optional amount; `null` and missing become `None`
pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => decimal_from_value(value).map(Some),
    }
}

/// Format an amount with the currency prefix and two decimals
///
/// Midpoints round away from zero. Negative values carry the sign before the
/// prefix: `-$12.50`.
pub fn format_currency(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", CURRENCY_PREFIX, rounded.abs())
    } else {
        format!("{}{}", CURRENCY_PREFIX, rounded.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "deserialize_optional_amount")]
        other: Option<Decimal>,
    }

    #[test]
    fn test_number_keeps_written_digits() {
        let probe: Probe = serde_json::from_str(r#"{"amount": 1000.005}"#).unwrap();
        assert_eq!(probe.amount, Decimal::from_str("1000.005").unwrap());
        assert!(probe.other.is_none());
    }

    #[test]
    fn test_string_and_null() {
        let probe: Probe = serde_json::from_str(r#"{"amount": "-42.10", "other": null}"#).unwrap();
        assert_eq!(probe.amount, Decimal::from_str("-42.10").unwrap());
        assert!(probe.other.is_none());
    }

    #[test]
    fn test_rejects_bool() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"amount": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_rounds_half_up() {
        assert_eq!(format_currency(Decimal::from_str("1000.005").unwrap()), "$1000.01");
        assert_eq!(format_currency(Decimal::from_str("400.002").unwrap()), "$400.00");
        assert_eq!(format_currency(Decimal::from(600)), "$600.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_currency(Decimal::from_str("-12.5").unwrap()), "-$12.50");
        assert_eq!(format_currency(Decimal::from_str("-0.001").unwrap()), "$0.00");
    }
}
