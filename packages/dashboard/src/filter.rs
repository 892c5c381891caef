//! The filter engine.

use accident_dash_accident_models::AccidentRecord;
use accident_dash_dashboard_models::ValidatedFilter;

use crate::store::RecordStore;

/// The records of a store that match a filter, in store order.
///
/// Borrowed from the [`RecordStore`]; lives for one render cycle.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a AccidentRecord>,
}

impl<'a> FilteredView<'a> {
    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matching records, in store order.
    pub fn iter(&self) -> impl Iterator<Item = &'a AccidentRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Applies a validated filter to every record of the store.
///
/// Pure and total: the same inputs always give the same sequence, and an
/// empty result is a normal outcome.
#[must_use]
pub fn apply<'a>(store: &'a RecordStore, filter: &ValidatedFilter) -> FilteredView<'a> {
    let records: Vec<&AccidentRecord> = store
        .records()
        .iter()
        .filter(|record| filter.matches(record))
        .collect();

    log::debug!(
        "Filter {:?} matched {} of {} records",
        filter.state(),
        records.len(),
        store.len()
    );

    FilteredView { records }
}
