//! Filter state and its validation.
//!
//! [`FilterState`] is what the controls currently show. It only becomes
//! usable by the filter engine after [`FilterState::validate`] turns it
//! into a [`ValidatedFilter`], which cannot be constructed any other way.

use accident_dash_accident_models::{AccidentRecord, Severity, YearMonth};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by filter validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The start period is after the end period.
    #[error("Start period {start} is after end period {end}")]
    InvalidRange {
        /// Selected start period.
        start: YearMonth,
        /// Selected end period.
        end: YearMonth,
    },
}

/// The user's current period and severity selection.
///
/// `None` on any field means "unconstrained" for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Inclusive lower bound.
    pub start: Option<YearMonth>,
    /// Inclusive upper bound.
    pub end: Option<YearMonth>,
    /// Required severity.
    pub severity: Option<Severity>,
}

impl FilterState {
    /// A state that imposes no restriction at all.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self {
            start: None,
            end: None,
            severity: None,
        }
    }

    /// Checks the period invariant.
    ///
    /// The state is invalid exactly when both bounds are present and the
    /// start is after the end.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRange`] if `start > end`.
    pub fn validate(&self) -> Result<ValidatedFilter, FilterError> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(FilterError::InvalidRange { start, end });
        }
        Ok(ValidatedFilter(*self))
    }
}

/// A [`FilterState`] known to satisfy `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidatedFilter(FilterState);

impl ValidatedFilter {
    /// A filter that lets every record through.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self(FilterState::unconstrained())
    }

    /// The validated state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.0
    }

    /// Inclusion predicate used by the filter engine.
    #[must_use]
    pub fn matches(&self, record: &AccidentRecord) -> bool {
        let state = &self.0;

        if state.severity.is_some_and(|s| s != record.severity) {
            return false;
        }

        if state.start.is_none() && state.end.is_none() {
            return true;
        }

        let key = record.year_month();
        state.start.is_none_or(|start| key >= start) && state.end.is_none_or(|end| key <= end)
    }
}
