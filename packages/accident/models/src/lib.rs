#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record types, severity classes and road-feature flags.
//!
//! This crate defines the canonical shape of one accident event as it
//! appears in the cleaned dataset. Records are deserialized straight from
//! the dataset's JSON keys (`Start_Time`, `State`, `Severity`, ...) and are
//! never mutated afterwards; anything derived from them (year, year-month)
//! is computed on demand.

pub mod parsing;
pub mod period;

use chrono::{Datelike as _, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use period::{ParseYearMonthError, YearMonth};

/// Severity class of an accident, from 1 (minor) to 4 (severe).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    /// Level 1: little impact on traffic
    Minor = 1,
    /// Level 2: noticeable slowdown
    Moderate = 2,
    /// Level 3: significant delay
    Serious = 3,
    /// Level 4: road closure or long delay
    Severe = 4,
}

impl Severity {
    /// Returns the numeric value of this severity class.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity class from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-4.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Minor),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Serious),
            4 => Ok(Self::Severe),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Returns the fixed severity domain in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Serious, Self::Severe]
    }
}

impl TryFrom<u8> for Severity {
    type Error = InvalidSeverityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.value()
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid severity value {value}: expected 1-4")]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

/// Boolean road-feature attributes of an accident's location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoadFeature {
    /// Traffic signal nearby
    #[serde(rename = "Traffic_Signal")]
    #[strum(serialize = "Traffic_Signal")]
    TrafficSignal,
    /// Stop sign nearby
    Stop,
    /// Junction or interchange
    Junction,
    /// Roundabout
    Roundabout,
    /// Railway crossing
    Railway,
    /// Highway
    Highway,
}

impl RoadFeature {
    /// Returns all road features in their canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TrafficSignal,
            Self::Stop,
            Self::Junction,
            Self::Roundabout,
            Self::Railway,
            Self::Highway,
        ]
    }

    /// Human-readable label (e.g. `"Traffic Signal"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TrafficSignal => "Traffic Signal",
            Self::Stop => "Stop",
            Self::Junction => "Junction",
            Self::Roundabout => "Roundabout",
            Self::Railway => "Railway",
            Self::Highway => "Highway",
        }
    }
}

/// The road-feature flags carried by each record.
///
/// `Highway` is absent from older dataset exports and defaults to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadFeatures {
    /// Traffic signal nearby.
    #[serde(rename = "Traffic_Signal")]
    pub traffic_signal: bool,
    /// Stop sign nearby.
    #[serde(rename = "Stop")]
    pub stop: bool,
    /// Junction nearby.
    #[serde(rename = "Junction")]
    pub junction: bool,
    /// Roundabout nearby.
    #[serde(rename = "Roundabout")]
    pub roundabout: bool,
    /// Railway crossing nearby.
    #[serde(rename = "Railway")]
    pub railway: bool,
    /// On a highway.
    #[serde(rename = "Highway", default)]
    pub highway: bool,
}

impl RoadFeatures {
    /// Returns whether the given feature flag is set.
    #[must_use]
    pub const fn has(&self, feature: RoadFeature) -> bool {
        match feature {
            RoadFeature::TrafficSignal => self.traffic_signal,
            RoadFeature::Stop => self.stop,
            RoadFeature::Junction => self.junction,
            RoadFeature::Roundabout => self.roundabout,
            RoadFeature::Railway => self.railway,
            RoadFeature::Highway => self.highway,
        }
    }
}

/// One accident event from the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Source identifier (e.g. `"A-1"`), when present.
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// When the accident started.
    #[serde(rename = "Start_Time", with = "parsing::start_time")]
    pub start_time: NaiveDateTime,
    /// City name, when present.
    #[serde(rename = "City", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Two-letter state code.
    #[serde(rename = "State")]
    pub state: String,
    /// Severity class.
    #[serde(rename = "Severity")]
    pub severity: Severity,
    /// Reported weather condition, when present.
    #[serde(
        rename = "Weather_Condition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weather_condition: Option<String>,
    /// Road-feature flags.
    #[serde(flatten)]
    pub features: RoadFeatures,
}

impl AccidentRecord {
    /// Calendar year of [`Self::start_time`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start_time.year()
    }

    /// Year-month key of [`Self::start_time`].
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_datetime(&self.start_time)
    }

    /// Returns whether the given road-feature flag is set on this record.
    #[must_use]
    pub const fn has_feature(&self, feature: RoadFeature) -> bool {
        self.features.has(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_from_value_roundtrip() {
        for v in 1..=4u8 {
            let severity = Severity::from_value(v).unwrap();
            assert_eq!(severity.value(), v);
        }
        assert!(Severity::from_value(0).is_err());
        assert!(Severity::from_value(5).is_err());
    }

    #[test]
    fn severity_domain_is_ascending() {
        let values: Vec<u8> = Severity::all().iter().map(|s| s.value()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn road_feature_parses_dataset_keys() {
        assert_eq!(
            "Traffic_Signal".parse::<RoadFeature>().unwrap(),
            RoadFeature::TrafficSignal
        );
        assert_eq!("Railway".parse::<RoadFeature>().unwrap(), RoadFeature::Railway);
        assert_eq!(RoadFeature::TrafficSignal.as_ref(), "Traffic_Signal");
        assert_eq!(RoadFeature::TrafficSignal.label(), "Traffic Signal");
    }

    #[test]
    fn deserializes_dataset_row() {
        let json = r#"{
            "ID": "A-1",
            "Start_Time": "2016-02-08 05:46:00",
            "City": "Dayton",
            "State": "OH",
            "Severity": 3,
            "Weather_Condition": "Light Rain",
            "Traffic_Signal": false,
            "Stop": false,
            "Junction": true,
            "Roundabout": false,
            "Railway": false,
            "Date": 1454889600000
        }"#;

        let record: AccidentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.state, "OH");
        assert_eq!(record.severity, Severity::Serious);
        assert_eq!(record.year(), 2016);
        assert_eq!(record.year_month().to_string(), "2016-02");
        assert!(record.has_feature(RoadFeature::Junction));
        assert!(!record.has_feature(RoadFeature::Highway));
        assert_eq!(record.weather_condition.as_deref(), Some("Light Rain"));
    }

    #[test]
    fn rejects_out_of_range_severity() {
        let json = r#"{
            "Start_Time": "2016-02-08 05:46:00",
            "State": "OH",
            "Severity": 7,
            "Traffic_Signal": false,
            "Stop": false,
            "Junction": false,
            "Roundabout": false,
            "Railway": false
        }"#;

        assert!(serde_json::from_str::<AccidentRecord>(json).is_err());
    }

    #[test]
    fn rejects_unparseable_start_time() {
        let json = r#"{
            "Start_Time": "yesterday",
            "State": "OH",
            "Severity": 2,
            "Traffic_Signal": false,
            "Stop": false,
            "Junction": false,
            "Roundabout": false,
            "Railway": false
        }"#;

        assert!(serde_json::from_str::<AccidentRecord>(json).is_err());
    }
}
