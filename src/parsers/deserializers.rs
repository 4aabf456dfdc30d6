use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for export timestamps.
///
/// Accepts Unix epoch seconds (integer or fractional), RFC3339 strings, or
/// `YYYY-MM-DD HH:MM:SS` taken as UTC. Null and anything unreadable become `None`.
pub fn deserialize_epoch_seconds<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().and_then(epoch_seconds_to_datetime),
        Value::String(s) => parse_timestamp_str(&s),
        _ => None,
    })
}

fn parse_timestamp_str(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    value.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok().map(|naive| naive.and_utc())
    })
}

/// Decode a field, reading a value of the wrong shape as absent.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Like [`deserialize_lenient`], falling back to the type's default (null included).
pub fn deserialize_lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(deserialize_lenient(deserializer)?.unwrap_or_default())
}

/// Decode a list item by item; items that do not decode become `None`.
/// Anything other than an array is an empty list.
pub fn deserialize_lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(|item| T::deserialize(item).ok()).collect(),
        _ => Vec::new(),
    })
}

/// Convert fractional epoch seconds to a UTC timestamp.
pub fn epoch_seconds_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
