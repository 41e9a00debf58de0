//! `yyyy-MM-dd` (de)serialization for calendar dates
//!
//! Parse failures carry [`INVALID_DATE`] in their message so rejections raised by
//! the JSON and query extractors can be told apart from other malformed input.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d";

/// Marker embedded in every date parse failure
pub const INVALID_DATE: &str = "invalid date, expected yyyy-MM-dd";

pub fn parse(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), FORMAT)
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| de::Error::custom(format!("{}: '{}' ({})", INVALID_DATE, raw, e)))
}

/// Optional dates; an empty string reads as `None`
pub mod option {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse(&raw)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("{}: '{}' ({})", INVALID_DATE, raw, e))),
            _ => Ok(None),
        }
    }
}
