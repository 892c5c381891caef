//! The in-memory record store.
//!
//! Holds the full parsed dataset for the lifetime of a session. Nothing
//! mutates it after construction; the period options and year span the
//! charts need are derived once at load.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use accident_dash_accident_models::{AccidentRecord, YearMonth};
use accident_dash_dashboard_models::FilterState;

use crate::StoreError;
use crate::progress::ProgressCallback;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    /// A local JSON file.
    File(PathBuf),
    /// An `http(s)` URL serving the JSON document.
    Url(String),
}

impl FromStr for DataLocation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// The full, immutable dataset.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<AccidentRecord>,
    periods: Vec<YearMonth>,
}

impl RecordStore {
    /// Builds a store from already-parsed records.
    #[must_use]
    pub fn new(records: Vec<AccidentRecord>) -> Self {
        let periods: BTreeSet<YearMonth> = records.iter().map(AccidentRecord::year_month).collect();
        Self {
            records,
            periods: periods.into_iter().collect(),
        }
    }

    /// Fetches and parses the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data cannot be read or fetched, is not
    /// a JSON array of valid records, or is empty.
    pub async fn load(
        location: &DataLocation,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Self, StoreError> {
        log::info!("Loading accident records from {location}");
        progress.set_message(format!("Loading {location}"));

        let bytes = match location {
            DataLocation::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                progress.set_total(bytes.len() as u64);
                progress.inc(bytes.len() as u64);
                bytes
            }
            DataLocation::Url(url) => fetch(url, progress).await?,
        };

        progress.set_message("Parsing records".to_string());
        let store = Self::from_json_slice(&bytes)?;

        progress.finish(format!("Loaded {} records", store.len()));
        log::info!(
            "Loaded {} records spanning {} months",
            store.len(),
            store.periods.len()
        );
        Ok(store)
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] on malformed input and
    /// [`StoreError::Empty`] if the array has no elements.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        let records: Vec<AccidentRecord> = serde_json::from_slice(bytes)?;
        if records.is_empty() {
            return Err(StoreError::Empty);
        }
        Ok(Self::new(records))
    }

    /// All records, in dataset order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct year-month keys present in the data, ascending. These are
    /// the options of both period selectors.
    #[must_use]
    pub fn periods(&self) -> &[YearMonth] {
        &self.periods
    }

    /// Earliest period in the data.
    #[must_use]
    pub fn earliest_period(&self) -> Option<YearMonth> {
        self.periods.first().copied()
    }

    /// Latest period in the data.
    #[must_use]
    pub fn latest_period(&self) -> Option<YearMonth> {
        self.periods.last().copied()
    }

    /// Every year from the earliest to the latest period, inclusive.
    ///
    /// This is the year axis of the dense per-year charts, so it does not
    /// shrink when a filter removes whole years.
    #[must_use]
    pub fn year_span(&self) -> Vec<i32> {
        match (self.earliest_period(), self.latest_period()) {
            (Some(first), Some(last)) => (first.year()..=last.year()).collect(),
            _ => Vec::new(),
        }
    }

    /// The reset state: full period range, severity unconstrained.
    #[must_use]
    pub fn default_filter(&self) -> FilterState {
        FilterState {
            start: self.earliest_period(),
            end: self.latest_period(),
            severity: None,
        }
    }
}

async fn fetch(url: &str, progress: &Arc<dyn ProgressCallback>) -> Result<Vec<u8>, StoreError> {
    let mut response = reqwest::get(url).await?.error_for_status()?;

    if let Some(len) = response.content_length() {
        progress.set_total(len);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        progress.inc(chunk.len() as u64);
        body.extend_from_slice(&chunk);
    }

    log::debug!("Fetched {} bytes from {url}", body.len());
    Ok(body)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::progress::null_progress;
    use accident_dash_accident_models::{RoadFeatures, Severity};
    use accident_dash_accident_models::parsing::parse_start_time;

    /// Builds a record with no road features set.
    pub fn record(start_time: &str, state: &str, severity: u8) -> AccidentRecord {
        AccidentRecord {
            id: None,
            start_time: parse_start_time(start_time).unwrap(),
            city: None,
            state: state.to_string(),
            severity: Severity::from_value(severity).unwrap(),
            weather_condition: None,
            features: RoadFeatures::default(),
        }
    }

    #[test]
    fn derives_sorted_distinct_periods() {
        let store = RecordStore::new(vec![
            record("2017-01-05 10:00:00", "TX", 2),
            record("2016-06-01 08:00:00", "CA", 4),
            record("2016-01-10 09:00:00", "CA", 2),
            record("2016-06-20 09:00:00", "NY", 1),
        ]);

        let periods: Vec<String> = store.periods().iter().map(ToString::to_string).collect();
        assert_eq!(periods, vec!["2016-01", "2016-06", "2017-01"]);
        assert_eq!(store.year_span(), vec![2016, 2017]);
    }

    #[test]
    fn year_span_fills_gaps() {
        let store = RecordStore::new(vec![
            record("2016-03-01 00:00:00", "CA", 1),
            record("2019-03-01 00:00:00", "CA", 1),
        ]);
        assert_eq!(store.year_span(), vec![2016, 2017, 2018, 2019]);
    }

    #[test]
    fn default_filter_spans_dataset() {
        let store = RecordStore::new(vec![
            record("2016-03-01 00:00:00", "CA", 1),
            record("2023-03-01 00:00:00", "CA", 1),
        ]);
        let filter = store.default_filter();
        assert_eq!(filter.start.map(|p| p.to_string()).as_deref(), Some("2016-03"));
        assert_eq!(filter.end.map(|p| p.to_string()).as_deref(), Some("2023-03"));
        assert_eq!(filter.severity, None);
    }

    #[test]
    fn empty_store_has_no_periods() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        assert!(store.year_span().is_empty());
        assert_eq!(store.default_filter(), FilterState::unconstrained());
    }

    #[test]
    fn rejects_empty_dataset() {
        assert!(matches!(
            RecordStore::from_json_slice(b"[]"),
            Err(StoreError::Empty)
        ));
    }

    #[test]
    fn rejects_malformed_dataset() {
        assert!(matches!(
            RecordStore::from_json_slice(b"{\"not\": \"an array\"}"),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn parses_location() {
        assert_eq!(
            "https://example.com/a.json".parse::<DataLocation>().unwrap(),
            DataLocation::Url("https://example.com/a.json".to_string())
        );
        assert_eq!(
            "data/accidents_cleaned.json".parse::<DataLocation>().unwrap(),
            DataLocation::File(PathBuf::from("data/accidents_cleaned.json"))
        );
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let location = DataLocation::File(PathBuf::from("/nonexistent/accidents.json"));
        let result = RecordStore::load(&location, &null_progress()).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
