#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and chart aggregate types for the accident dashboard.
//!
//! Aggregates are plain owned values serialized to JSON in `camelCase`, so
//! the same shapes feed both the terminal renderers and the static JSON
//! output consumed by the web charts.

pub mod filter;

use accident_dash_accident_models::{RoadFeature, Severity};
use accident_dash_geography_models::StateBoundary;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use filter::{FilterError, FilterState, ValidatedFilter};

/// Every chart the dashboard can draw.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Horizontal bar chart of the top states.
    TopStatesBar,
    /// Pie chart of the top states.
    TopStatesPie,
    /// Multi-line chart of yearly counts per severity.
    SeverityTrend,
    /// Grouped bar chart of yearly counts for the top states.
    StatesByYear,
    /// Stacked bar chart of severities per road feature.
    RoadFeatureSeverity,
    /// Scatter plot of yearly counts per road feature.
    RoadFeatureTrend,
    /// Bar chart of counts per severity.
    SeverityDistribution,
    /// Bar chart of the most common weather conditions.
    TopWeather,
    /// Choropleth of counts per state.
    StateHeatmap,
}

impl ChartKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TopStatesBar,
            Self::TopStatesPie,
            Self::SeverityTrend,
            Self::StatesByYear,
            Self::RoadFeatureSeverity,
            Self::RoadFeatureTrend,
            Self::SeverityDistribution,
            Self::TopWeather,
            Self::StateHeatmap,
        ]
    }

    /// Chart title shown above the rendered output.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TopStatesBar => "Top States by Accidents",
            Self::TopStatesPie => "Top States by Accidents (share)",
            Self::SeverityTrend => "Accident Trends by Severity",
            Self::StatesByYear => "Top States by Year",
            Self::RoadFeatureSeverity => "Severity by Road Feature",
            Self::RoadFeatureTrend => "Road Feature Accidents by Year",
            Self::SeverityDistribution => "Accidents by Severity",
            Self::TopWeather => "Accidents by Weather Condition",
            Self::StateHeatmap => "Accidents per State",
        }
    }
}

/// Accident count for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCount {
    /// Two-letter state code.
    pub state: String,
    /// Number of accidents.
    pub count: u64,
}

/// Accident count for an arbitrary label (e.g. a weather condition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// Group label.
    pub label: String,
    /// Number of accidents.
    pub count: u64,
}

/// Accident count for one severity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Severity class.
    pub severity: Severity,
    /// Number of accidents.
    pub count: u64,
}

/// Accident count for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Number of accidents.
    pub count: u64,
}

/// One line of the severity trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeveritySeries {
    /// Severity class of this line.
    pub severity: Severity,
    /// One point per year of the domain, zeros included.
    pub points: Vec<YearCount>,
}

/// Dense year × severity grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSeverityGrid {
    /// Year domain, ascending.
    pub years: Vec<i32>,
    /// One series per severity, ascending.
    pub series: Vec<SeveritySeries>,
    /// Largest single count, for axis scaling.
    pub max_count: u64,
}

/// One stacked bar: severities for a road feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSeverityStack {
    /// Road feature of this bar.
    pub feature: RoadFeature,
    /// Counts per severity, ascending, zeros included.
    pub counts: Vec<SeverityCount>,
    /// Sum of `counts`.
    pub total: u64,
}

/// Road feature × severity stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadFeatureStacks {
    /// One stack per configured feature, in configured order.
    pub stacks: Vec<FeatureSeverityStack>,
    /// Largest stack total, for axis scaling.
    pub max_total: u64,
}

/// One scatter series: yearly counts for a road feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSeries {
    /// Road feature of this series.
    pub feature: RoadFeature,
    /// One point per year of the domain, zeros included.
    pub points: Vec<YearCount>,
}

/// Dense year × road feature grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearFeatureGrid {
    /// Year domain, ascending.
    pub years: Vec<i32>,
    /// One series per configured feature.
    pub series: Vec<FeatureSeries>,
    /// Largest single count, for axis scaling.
    pub max_count: u64,
}

/// One group of the grouped bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStateRow {
    /// Calendar year.
    pub year: i32,
    /// Count per top state, in the order of [`YearStateGroups::states`].
    pub counts: Vec<StateCount>,
}

/// Year × top-state grouped counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStateGroups {
    /// Top states by total count, descending.
    pub states: Vec<String>,
    /// One row per year of the fixed domain.
    pub rows: Vec<YearStateRow>,
    /// Largest single count, for axis scaling.
    pub max_count: u64,
}

/// One state of the choropleth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethCell {
    /// Boundary feature this cell colours.
    pub boundary: StateBoundary,
    /// Accidents in the state (0 when unmatched).
    pub count: u64,
    /// Index into [`StateChoropleth::buckets`].
    pub bucket: usize,
    /// Fill colour of that bucket.
    pub color: String,
}

/// One legend entry of the choropleth threshold scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethBucket {
    /// Inclusive lower bound.
    pub from: u64,
    /// Exclusive upper bound, `None` for the last bucket.
    pub to: Option<u64>,
    /// Fill colour.
    pub color: String,
}

/// Counts per state joined onto boundary features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChoropleth {
    /// One cell per boundary feature, in file order.
    pub cells: Vec<ChoroplethCell>,
    /// Legend buckets.
    pub buckets: Vec<ChoroplethBucket>,
}

/// The derived summary for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ChartAggregate {
    /// Top states ranked by count.
    TopStates(Vec<StateCount>),
    /// Dense year × severity grid.
    YearSeverity(YearSeverityGrid),
    /// Year × top-state grouped counts.
    YearStates(YearStateGroups),
    /// Road feature × severity stacks.
    FeatureSeverity(RoadFeatureStacks),
    /// Dense year × road feature grid.
    YearFeature(YearFeatureGrid),
    /// Counts per severity.
    Severities(Vec<SeverityCount>),
    /// Top labels ranked by count.
    TopLabels(Vec<LabelCount>),
    /// State choropleth.
    Choropleth(StateChoropleth),
}

impl ChartAggregate {
    /// Returns whether the aggregate holds no non-zero count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::TopStates(counts) => counts.is_empty(),
            Self::YearSeverity(grid) => grid.max_count == 0,
            Self::YearStates(groups) => groups.max_count == 0,
            Self::FeatureSeverity(stacks) => stacks.max_total == 0,
            Self::YearFeature(grid) => grid.max_count == 0,
            Self::Severities(counts) => counts.iter().all(|c| c.count == 0),
            Self::TopLabels(counts) => counts.is_empty(),
            Self::Choropleth(map) => map.cells.iter().all(|c| c.count == 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_names_are_snake_case() {
        assert_eq!(ChartKind::TopStatesBar.to_string(), "top_states_bar");
        assert_eq!(
            "road_feature_trend".parse::<ChartKind>().unwrap(),
            ChartKind::RoadFeatureTrend
        );
    }

    #[test]
    fn chart_kinds_are_unique() {
        let mut kinds = ChartKind::all().to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), ChartKind::all().len());
    }

    #[test]
    fn aggregate_serializes_tagged() {
        let aggregate = ChartAggregate::TopStates(vec![StateCount {
            state: "CA".to_string(),
            count: 5,
        }]);
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["type"], "topStates");
        assert_eq!(json["data"][0]["state"], "CA");
        assert_eq!(json["data"][0]["count"], 5);
    }

    #[test]
    fn empty_detection() {
        assert!(ChartAggregate::TopStates(Vec::new()).is_empty());
        assert!(
            ChartAggregate::Severities(vec![SeverityCount {
                severity: Severity::Minor,
                count: 0,
            }])
            .is_empty()
        );
    }
}
