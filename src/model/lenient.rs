//! Deserializers for API fields that are sometimes missing, `null`, strings or garbage.
//!
//! None of these fail. A value that cannot be understood becomes `None` and the caller decides
//! what `None` means (usually zero).

use crate::model::Points;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Accepts a JSON number, a numeric string, `null` or anything else.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| to_decimal(&v)))
}

/// Accepts an RFC 3339 timestamp string, `null` or anything else.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => match DateTime::parse_from_rfc3339(&s) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring malformed timestamp '{s}': {e}");
                None
            }
        },
        _ => None,
    })
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    if parsed.is_none() {
        warn!("Ignoring malformed numeric value {value}");
    }
    parsed
}

/// Plain, comma-grouped (`1,250.50`) or scientific notation.
fn parse_decimal(s: &str) -> Option<Decimal> {
    Points::from_str(s)
        .map(Decimal::from)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "decimal")]
        value: Option<Decimal>,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
    }

    fn value(json: &str) -> Option<Decimal> {
        serde_json::from_str::<Row>(json).unwrap().value
    }

    #[test]
    fn test_decimal_number() {
        assert_eq!(value(r#"{"value": 12}"#), Some(Decimal::from(12)));
        assert_eq!(
            value(r#"{"value": 2.5}"#),
            Some(Decimal::from_str("2.5").unwrap())
        );
        assert_eq!(value(r#"{"value": 1e3}"#), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(value(r#"{"value": " -300 "}"#), Some(Decimal::from(-300)));
        assert_eq!(
            value(r#"{"value": "1,250.50"}"#),
            Some(Decimal::from_str("1250.50").unwrap())
        );
        assert_eq!(value(r#"{"value": "2e2"}"#), Some(Decimal::from(200)));
    }

    #[test]
    fn test_decimal_missing_null_and_garbage() {
        assert_eq!(value(r#"{}"#), None);
        assert_eq!(value(r#"{"value": null}"#), None);
        assert_eq!(value(r#"{"value": ""}"#), None);
        assert_eq!(value(r#"{"value": "NaN"}"#), None);
        assert_eq!(value(r#"{"value": [1]}"#), None);
        assert_eq!(value(r#"{"value": true}"#), None);
    }

    #[test]
    fn test_timestamp() {
        let row: Row = serde_json::from_str(r#"{"at": "2024-03-01T10:15:00.000Z"}"#).unwrap();
        assert_eq!(row.at.unwrap().to_rfc3339(), "2024-03-01T10:15:00+00:00");
        let row: Row = serde_json::from_str(r#"{"at": "yesterday"}"#).unwrap();
        assert!(row.at.is_none());
    }
}
