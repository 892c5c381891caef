//! Chart configuration.
//!
//! The defaults in `config/dashboard.toml` are baked into the binary via
//! [`include_str!`]. A user file is merged over them table by table, so it
//! only needs to name the keys it changes.

use std::path::Path;

use accident_dash_accident_models::RoadFeature;
use accident_dash_dashboard_models::ChoroplethBucket;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default configuration embedded at compile time.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/dashboard.toml");

/// Settings for every chart the dashboard draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Top-N states bar and pie charts.
    pub top_states: TopNConfig,
    /// Top-N weather conditions chart.
    pub weather: TopNConfig,
    /// Grouped year × state bar chart.
    pub states_by_year: StatesByYearConfig,
    /// Feature lists of the road-feature charts.
    pub road_features: RoadFeatureConfig,
    /// Choropleth colour scale.
    pub heatmap: ThresholdScale,
}

/// How many ranked entries a top-N chart keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNConfig {
    /// Number of entries.
    pub limit: usize,
}

/// Grouped bar chart settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatesByYearConfig {
    /// Number of top states to group.
    pub top: usize,
    /// First year of the fixed year axis.
    pub first_year: i32,
    /// Last year of the fixed year axis (inclusive).
    pub last_year: i32,
}

impl StatesByYearConfig {
    /// The fixed year axis.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).collect()
    }
}

/// Road features shown by each road-feature chart, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadFeatureConfig {
    /// Stacked severity chart.
    pub stacked: Vec<RoadFeature>,
    /// Per-year scatter chart.
    pub trend: Vec<RoadFeature>,
}

/// A threshold colour scale: `thresholds[i]` is the inclusive lower bound
/// of the bucket coloured `colors[i]`; the last bucket is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdScale {
    /// Bucket lower bounds, strictly ascending, starting at 0.
    pub thresholds: Vec<u64>,
    /// One colour per bucket.
    pub colors: Vec<String>,
}

impl ThresholdScale {
    /// Index of the bucket containing `count`.
    #[must_use]
    pub fn bucket(&self, count: u64) -> usize {
        self.thresholds
            .partition_point(|t| *t <= count)
            .saturating_sub(1)
    }

    /// Colour of the bucket containing `count`.
    #[must_use]
    pub fn color(&self, count: u64) -> &str {
        self.colors
            .get(self.bucket(count))
            .map_or("", String::as_str)
    }

    /// Legend entries, one per bucket.
    #[must_use]
    pub fn buckets(&self) -> Vec<ChoroplethBucket> {
        self.thresholds
            .iter()
            .zip(&self.colors)
            .enumerate()
            .map(|(i, (from, color))| ChoroplethBucket {
                from: *from,
                to: self.thresholds.get(i + 1).copied(),
                color: color.clone(),
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.first() != Some(&0) {
            return Err(invalid("heatmap.thresholds must start at 0"));
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid("heatmap.thresholds must be strictly ascending"));
        }
        if self.thresholds.len() != self.colors.len() {
            return Err(invalid(format!(
                "heatmap has {} thresholds but {} colors",
                self.thresholds.len(),
                self.colors.len()
            )));
        }
        Ok(())
    }
}

impl DashboardConfig {
    /// Loads configuration, merging `path` (if given) over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, does not match the schema, or holds out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::from_toml_str("");
        };

        log::info!("Loading dashboard config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses `overrides` and merges it over the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or invalid values.
    pub fn from_toml_str(overrides: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let overrides: toml::Table = toml::from_str(overrides)?;
        merge(&mut table, overrides);

        let config: Self = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_states.limit == 0 {
            return Err(invalid("top_states.limit must be at least 1"));
        }
        if self.weather.limit == 0 {
            return Err(invalid("weather.limit must be at least 1"));
        }
        if self.states_by_year.top == 0 {
            return Err(invalid("states_by_year.top must be at least 1"));
        }
        if self.states_by_year.first_year > self.states_by_year.last_year {
            return Err(invalid(format!(
                "states_by_year.first_year ({}) is after last_year ({})",
                self.states_by_year.first_year, self.states_by_year.last_year
            )));
        }
        self.heatmap.validate()
    }
}

impl Default for DashboardConfig {
    /// The embedded defaults.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. Since it is a compile-time
    /// constant, a failure here is a development error caught by tests.
    fn default() -> Self {
        Self::from_toml_str("")
            .unwrap_or_else(|e| panic!("Failed to parse embedded dashboard.toml: {e}"))
    }
}

/// Recursively merges `overrides` into `base`. Nested tables merge key by
/// key; any other value replaces the base value wholesale.
fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(override_table)) => {
                merge(base_table, override_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = DashboardConfig::default();
        assert_eq!(config.top_states.limit, 10);
        assert_eq!(config.weather.limit, 10);
        assert_eq!(config.states_by_year.top, 5);
        assert_eq!(
            config.states_by_year.years(),
            vec![2016, 2017, 2018, 2019, 2020, 2021, 2022, 2023]
        );
        assert_eq!(
            config.road_features.stacked,
            vec![
                RoadFeature::TrafficSignal,
                RoadFeature::Stop,
                RoadFeature::Junction,
                RoadFeature::Roundabout,
                RoadFeature::Railway,
            ]
        );
        assert_eq!(config.road_features.trend.len(), 4);
        assert_eq!(config.heatmap.thresholds.len(), config.heatmap.colors.len());
    }

    #[test]
    fn overrides_merge_key_by_key() {
        let config = DashboardConfig::from_toml_str(
            "[states_by_year]\nlast_year = 2030\n\n[top_states]\nlimit = 3\n",
        )
        .unwrap();
        assert_eq!(config.states_by_year.first_year, 2016);
        assert_eq!(config.states_by_year.last_year, 2030);
        assert_eq!(config.states_by_year.top, 5);
        assert_eq!(config.top_states.limit, 3);
    }

    #[test]
    fn rejects_inverted_year_axis() {
        let result = DashboardConfig::from_toml_str("[states_by_year]\nfirst_year = 2024\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_unknown_road_feature() {
        let result = DashboardConfig::from_toml_str("[road_features]\ntrend = [\"Bridge\"]\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn rejects_mismatched_heatmap_scale() {
        let result = DashboardConfig::from_toml_str(
            "[heatmap]\nthresholds = [0, 10]\ncolors = [\"#fff\"]\n",
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn threshold_buckets() {
        let scale = ThresholdScale {
            thresholds: vec![0, 1000, 5000],
            colors: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };
        assert_eq!(scale.bucket(0), 0);
        assert_eq!(scale.bucket(999), 0);
        assert_eq!(scale.bucket(1000), 1);
        assert_eq!(scale.bucket(4999), 1);
        assert_eq!(scale.bucket(5000), 2);
        assert_eq!(scale.bucket(u64::MAX), 2);
        assert_eq!(scale.color(1500), "b");

        let buckets = scale.buckets();
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].to, Some(1000));
        assert_eq!(buckets[2].from, 5000);
        assert_eq!(buckets[2].to, None);
    }
}
