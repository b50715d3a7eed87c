//! Lenient field decoding for the CSV sources.
//!
//! Unparseable temporal values are coerced to `None` and left for the
//! schema validator to reject, so a bad timestamp is reported as a schema
//! problem instead of a CSV decoding failure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an instant, normalizing it to UTC. Naive values are taken to be UTC already.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }

    if let Ok(timestamp) = DateTime::parse_from_str(value, OFFSET_TIMESTAMP_FORMAT) {
        return Some(timestamp.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|timestamp| timestamp.and_utc())
}

/// Parses a calendar date; full timestamps are reduced to their UTC date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
        .or_else(|| parse_timestamp(value).map(|timestamp| timestamp.date_naive()))
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "f" | "n" => Some(false),
        _ => None
    }
}

/// Parses a rate cell. Empty and unparseable values both become `None`.
pub fn parse_rate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(parse_timestamp(&value))
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_bool(&value).ok_or_else(|| de::Error::custom(format!("invalid boolean [{value}]")))
}

pub fn lenient_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_bool(deserializer).map(u8::from)
}

pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Some)
        .map_err(|error| de::Error::custom(format!("invalid amount [{value}]: {error}")))
}

/// Decodes the nested activity record from its JSON text.
///
/// Text that is not JSON is kept as a JSON string so that it later reads as
/// "present but not a mapping".
pub fn activity_record<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))))
}
