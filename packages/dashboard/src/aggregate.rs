//! Per-chart aggregators.
//!
//! Every function here is a pure reduction over a [`FilteredView`]. None of
//! them can fail, and all of them turn an empty view into an all-zero (or
//! empty) aggregate. Years are derived from each record's timestamp on the
//! fly; nothing is written back to the records.

use std::collections::BTreeMap;

use accident_dash_accident_models::{RoadFeature, Severity};
use accident_dash_dashboard_models::{
    ChoroplethCell, FeatureSeries, FeatureSeverityStack, LabelCount, RoadFeatureStacks,
    SeverityCount, SeveritySeries, StateChoropleth, StateCount, YearCount, YearFeatureGrid,
    YearSeverityGrid, YearStateGroups, YearStateRow,
};
use accident_dash_geography_models::StateBoundary;

use crate::config::ThresholdScale;
use crate::filter::FilteredView;

/// Label used for records with no weather condition.
pub const UNKNOWN_WEATHER: &str = "Unknown";

/// Counts keys, then stable-sorts by descending count so that ties keep
/// the order in which each key was first seen.
fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, u64)> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for key in keys {
        if let Some(&i) = index.get(key) {
            counts[i].1 += 1;
        } else {
            index.insert(key, counts.len());
            counts.push((key, 1));
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Top `n` states by accident count, descending.
#[must_use]
pub fn top_states(view: &FilteredView<'_>, n: usize) -> Vec<StateCount> {
    ranked_counts(view.iter().map(|r| r.state.as_str()))
        .into_iter()
        .take(n)
        .map(|(state, count)| StateCount {
            state: state.to_string(),
            count,
        })
        .collect()
}

/// Top `n` weather conditions by accident count, descending. Records with
/// no condition are grouped under [`UNKNOWN_WEATHER`].
#[must_use]
pub fn top_weather(view: &FilteredView<'_>, n: usize) -> Vec<LabelCount> {
    ranked_counts(
        view.iter()
            .map(|r| r.weather_condition.as_deref().unwrap_or(UNKNOWN_WEATHER)),
    )
    .into_iter()
    .take(n)
    .map(|(label, count)| LabelCount {
        label: label.to_string(),
        count,
    })
    .collect()
}

/// Count per severity, all four severities always present.
#[must_use]
pub fn severity_distribution(view: &FilteredView<'_>) -> Vec<SeverityCount> {
    let mut counts = [0u64; 4];
    for record in view.iter() {
        counts[severity_index(record.severity)] += 1;
    }

    Severity::all()
        .iter()
        .map(|&severity| SeverityCount {
            severity,
            count: counts[severity_index(severity)],
        })
        .collect()
}

/// Dense year × severity grid over `years`.
///
/// Every severity gets one point per year, zero where nothing matched.
/// Records whose year is outside `years` are ignored.
#[must_use]
pub fn year_severity(view: &FilteredView<'_>, years: &[i32]) -> YearSeverityGrid {
    let mut counts: BTreeMap<(i32, Severity), u64> = BTreeMap::new();
    for record in view.iter() {
        *counts.entry((record.year(), record.severity)).or_default() += 1;
    }

    let series: Vec<SeveritySeries> = Severity::all()
        .iter()
        .map(|&severity| SeveritySeries {
            severity,
            points: years
                .iter()
                .map(|&year| YearCount {
                    year,
                    count: counts.get(&(year, severity)).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    let max_count = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.count))
        .max()
        .unwrap_or(0);

    YearSeverityGrid {
        years: years.to_vec(),
        series,
        max_count,
    }
}

/// Severity stacks for each of `features`.
#[must_use]
pub fn road_feature_severity(view: &FilteredView<'_>, features: &[RoadFeature]) -> RoadFeatureStacks {
    let stacks: Vec<FeatureSeverityStack> = features
        .iter()
        .map(|&feature| {
            let mut counts = [0u64; 4];
            for record in view.iter().filter(|r| r.has_feature(feature)) {
                counts[severity_index(record.severity)] += 1;
            }

            FeatureSeverityStack {
                feature,
                counts: Severity::all()
                    .iter()
                    .map(|&severity| SeverityCount {
                        severity,
                        count: counts[severity_index(severity)],
                    })
                    .collect(),
                total: counts.iter().sum(),
            }
        })
        .collect();

    let max_total = stacks.iter().map(|s| s.total).max().unwrap_or(0);

    RoadFeatureStacks { stacks, max_total }
}

/// Dense year × road feature grid over `years`.
#[must_use]
pub fn year_feature(
    view: &FilteredView<'_>,
    features: &[RoadFeature],
    years: &[i32],
) -> YearFeatureGrid {
    let series: Vec<FeatureSeries> = features
        .iter()
        .map(|&feature| {
            let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
            for record in view.iter().filter(|r| r.has_feature(feature)) {
                *by_year.entry(record.year()).or_default() += 1;
            }

            FeatureSeries {
                feature,
                points: years
                    .iter()
                    .map(|&year| YearCount {
                        year,
                        count: by_year.get(&year).copied().unwrap_or(0),
                    })
                    .collect(),
            }
        })
        .collect();

    let max_count = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.count))
        .max()
        .unwrap_or(0);

    YearFeatureGrid {
        years: years.to_vec(),
        series,
        max_count,
    }
}

/// Per-year counts for the `top` states of the view.
///
/// The states are ranked over the whole view; the year axis is the fixed
/// `years` list whatever the filter, so the chart's scale stays put.
#[must_use]
pub fn year_state_grouped(view: &FilteredView<'_>, top: usize, years: &[i32]) -> YearStateGroups {
    let states: Vec<String> = top_states(view, top)
        .into_iter()
        .map(|c| c.state)
        .collect();

    let mut counts: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for record in view.iter().filter(|r| states.contains(&r.state)) {
        *counts
            .entry((record.year(), record.state.as_str()))
            .or_default() += 1;
    }

    let rows: Vec<YearStateRow> = years
        .iter()
        .map(|&year| YearStateRow {
            year,
            counts: states
                .iter()
                .map(|state| StateCount {
                    state: state.clone(),
                    count: counts.get(&(year, state.as_str())).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    let max_count = rows
        .iter()
        .flat_map(|row| row.counts.iter().map(|c| c.count))
        .max()
        .unwrap_or(0);

    YearStateGroups {
        states,
        rows,
        max_count,
    }
}

/// Joins per-state counts onto boundary features and buckets them.
///
/// Boundaries whose name has no abbreviation, or whose state has no
/// records, get a count of zero.
#[must_use]
pub fn state_choropleth(
    view: &FilteredView<'_>,
    boundaries: &[StateBoundary],
    scale: &ThresholdScale,
) -> StateChoropleth {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in view.iter() {
        *counts.entry(record.state.as_str()).or_default() += 1;
    }

    let cells = boundaries
        .iter()
        .map(|boundary| {
            let count = boundary
                .abbreviation
                .as_deref()
                .and_then(|abbr| counts.get(abbr).copied())
                .unwrap_or(0);

            ChoroplethCell {
                boundary: boundary.clone(),
                count,
                bucket: scale.bucket(count),
                color: scale.color(count).to_string(),
            }
        })
        .collect();

    StateChoropleth {
        cells,
        buckets: scale.buckets(),
    }
}

/// Position of a severity in [`Severity::all`].
fn severity_index(severity: Severity) -> usize {
    usize::from(severity.value()) - 1
}
