//! Timestamp parsing for the dataset's `Start_Time` column.
//!
//! The cleaned export is not consistent about its timestamp format: most
//! rows are `YYYY-MM-DD HH:MM:SS`, some carry nanosecond fractions, and
//! re-exports may use the ISO `T` separator or a trailing offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Error returned when a `Start_Time` value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable timestamp '{value}'")]
pub struct ParseTimestampError {
    /// The raw value that failed to parse.
    pub value: String,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses a dataset timestamp into a naive (wall-clock) datetime.
///
/// Offsets are dropped after parsing so that the year-month of a record is
/// the one written in the dataset.
///
/// # Errors
///
/// Returns [`ParseTimestampError`] if no supported format matches.
pub fn parse_start_time(s: &str) -> Result<NaiveDateTime, ParseTimestampError> {
    let s = s.trim();

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight);
    }

    Err(ParseTimestampError {
        value: s.to_string(),
    })
}

/// `serde(with)` adapter for [`crate::AccidentRecord::start_time`].
pub mod start_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize as _, Deserializer, Serializer};

    const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serializes as `YYYY-MM-DD HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(OUTPUT_FORMAT))
    }

    /// Deserializes any format accepted by [`super::parse_start_time`].
    ///
    /// # Errors
    ///
    /// Returns a custom deserializer error if the value is not a string or
    /// cannot be parsed.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_start_time(&raw).map_err(serde::de::Error::custom)
    }
}
