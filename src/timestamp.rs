//! Calendar-time helpers shared by loaders and exporters.
//!
//! Every timestamp in chatmill is a `DateTime<Utc>` with microsecond precision.
//! Serialized output always uses one fixed text form, RFC 3339 with six
//! fractional digits and a `Z` suffix:
//!
//! ```rust
//! use chatmill::timestamp::{format_datetime, from_epoch_seconds};
//!
//! let ts = from_epoch_seconds(1705314600.5).unwrap();
//! assert_eq!(format_datetime(&ts), "2024-01-15T10:30:00.500000Z");
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Formats a timestamp in the canonical output form.
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Converts fractional epoch seconds to a UTC timestamp.
///
/// Returns `None` for non-finite or out-of-range values.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

/// Converts a JSON epoch value (number or numeric string) to a UTC timestamp.
///
/// Anything else, including `null`, yields `None`.
pub fn from_epoch_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch_seconds),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(from_epoch_seconds),
        _ => None,
    }
}

/// Parses ISO 8601 date-time text.
///
/// A trailing `Z` is normalized to `+00:00` before parsing. Strings with an
/// offset are converted to UTC; strings without one are taken as UTC.
/// Sub-microsecond digits are dropped.
pub fn parse_iso_datetime(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => trimmed.to_string(),
    };

    let parsed = DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.to_utc())
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
                .map(|naive| naive.and_utc())
        })?;

    DateTime::from_timestamp_micros(parsed.timestamp_micros())
}

/// Serde adapter for `Option<DateTime<Utc>>` fields using the canonical text form.
///
/// `None` serializes as `null`; missing fields deserialize as `None` when the
/// field also carries `#[serde(default)]`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format_datetime(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(text) => super::parse_iso_datetime(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time '{text}'"))),
            None => Ok(None),
        }
    }
}
