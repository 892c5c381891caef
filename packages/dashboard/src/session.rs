//! The filter controls of one dashboard session.
//!
//! A [`Session`] owns the store and the dispatcher, and exposes the
//! operations the controls perform: pick a start period, pick an end
//! period, pick a severity, reset. Every change is validated before
//! anything is recomputed. A rejected change stays visible in
//! [`Session::pending`] with both period controls marked, while the
//! charts keep showing the last accepted filter.

use accident_dash_accident_models::{Severity, YearMonth};
use accident_dash_dashboard_models::{FilterError, FilterState, ValidatedFilter};

use crate::dispatch::{DispatchReport, Dispatcher};
use crate::store::RecordStore;

/// Tells the user about a rejected filter change.
pub trait Notifier {
    /// Called once per rejected change.
    fn invalid_range(&mut self, error: &FilterError);
}

/// A [`Notifier`] that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn invalid_range(&mut self, error: &FilterError) {
        log::warn!("{error}");
    }
}

/// Which period controls are flagged as errored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMarks {
    pub start: bool,
    pub end: bool,
}

impl ErrorMarks {
    /// Whether any control is flagged.
    #[must_use]
    pub const fn any(self) -> bool {
        self.start || self.end
    }
}

pub struct Session {
    store: RecordStore,
    dispatcher: Dispatcher,
    notifier: Box<dyn Notifier>,
    pending: FilterState,
    applied: ValidatedFilter,
    marks: ErrorMarks,
    last_report: DispatchReport,
}

impl Session {
    /// Starts a session on a loaded store and renders every chart once
    /// with the default filter.
    #[must_use]
    pub fn start(store: RecordStore, mut dispatcher: Dispatcher, notifier: Box<dyn Notifier>) -> Self {
        let pending = store.default_filter();
        let applied = pending
            .validate()
            .unwrap_or_else(|_| ValidatedFilter::unconstrained());
        let last_report = dispatcher.dispatch(&store, &applied);

        log::info!(
            "Session started with {} charts over {} records",
            dispatcher.len(),
            store.len()
        );

        Self {
            store,
            dispatcher,
            notifier,
            pending,
            applied,
            marks: ErrorMarks::default(),
            last_report,
        }
    }

    /// Options of both period selectors, ascending.
    #[must_use]
    pub fn available_periods(&self) -> &[YearMonth] {
        self.store.periods()
    }

    /// Severity selector options; `None` is "any".
    #[must_use]
    pub fn available_severities(&self) -> Vec<Option<Severity>> {
        std::iter::once(None)
            .chain(Severity::all().iter().copied().map(Some))
            .collect()
    }

    /// Sets the start period.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRange`] if the new start is after the
    /// current end. Nothing is re-rendered in that case.
    pub fn set_start(&mut self, start: Option<YearMonth>) -> Result<&DispatchReport, FilterError> {
        self.pending.start = start;
        self.apply_pending()
    }

    /// Sets the end period.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRange`] if the new end is before the
    /// current start. Nothing is re-rendered in that case.
    pub fn set_end(&mut self, end: Option<YearMonth>) -> Result<&DispatchReport, FilterError> {
        self.pending.end = end;
        self.apply_pending()
    }

    /// Sets the severity constraint.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRange`] if the period controls are
    /// still in an invalid state.
    pub fn set_severity(
        &mut self,
        severity: Option<Severity>,
    ) -> Result<&DispatchReport, FilterError> {
        self.pending.severity = severity;
        self.apply_pending()
    }

    /// Restores the default filter, clears error marks and re-renders.
    pub fn reset(&mut self) -> &DispatchReport {
        log::debug!("Resetting filter to defaults");
        self.pending = self.store.default_filter();
        self.marks = ErrorMarks::default();
        self.applied = self
            .pending
            .validate()
            .unwrap_or_else(|_| ValidatedFilter::unconstrained());
        self.last_report = self.dispatcher.dispatch(&self.store, &self.applied);
        &self.last_report
    }

    fn apply_pending(&mut self) -> Result<&DispatchReport, FilterError> {
        match self.pending.validate() {
            Ok(filter) => {
                self.marks = ErrorMarks::default();
                self.applied = filter;
                self.last_report = self.dispatcher.dispatch(&self.store, &self.applied);
                Ok(&self.last_report)
            }
            Err(e) => {
                log::warn!("Rejected filter change: {e}");
                self.marks = ErrorMarks {
                    start: true,
                    end: true,
                };
                self.notifier.invalid_range(&e);
                Err(e)
            }
        }
    }

    /// What the controls currently show, valid or not.
    #[must_use]
    pub const fn pending(&self) -> &FilterState {
        &self.pending
    }

    /// The filter the charts were last rendered with.
    #[must_use]
    pub const fn applied(&self) -> &ValidatedFilter {
        &self.applied
    }

    #[must_use]
    pub const fn marks(&self) -> ErrorMarks {
        self.marks
    }

    /// Outcome of the last accepted render cycle.
    #[must_use]
    pub const fn last_report(&self) -> &DispatchReport {
        &self.last_report
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dispatch::tests::RecordingRenderer;
    use crate::store::tests::record;
    use accident_dash_dashboard_models::ChartKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CountingNotifier {
        errors: Rc<RefCell<Vec<FilterError>>>,
    }

    impl Notifier for CountingNotifier {
        fn invalid_range(&mut self, error: &FilterError) {
            self.errors.borrow_mut().push(*error);
        }
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn session() -> (Session, RecordingRenderer, CountingNotifier) {
        let store = RecordStore::new(vec![
            record("2016-01-15 08:00:00", "CA", 2),
            record("2016-06-03 17:30:00", "CA", 4),
            record("2017-01-02 12:00:00", "TX", 2),
        ]);
        let recorder = RecordingRenderer::default();
        let notifier = CountingNotifier::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        dispatcher.register(ChartKind::TopStatesBar, Box::new(recorder.clone()));

        let session = Session::start(store, dispatcher, Box::new(notifier.clone()));
        (session, recorder, notifier)
    }

    #[test]
    fn start_renders_with_defaults() {
        let (session, recorder, _) = session();
        assert_eq!(recorder.calls.borrow().len(), 1);
        assert_eq!(session.last_report().matched, 3);
        assert_eq!(session.pending().start, Some(ym("2016-01")));
        assert_eq!(session.pending().end, Some(ym("2017-01")));
        assert_eq!(session.pending().severity, None);
    }

    #[test]
    fn accepted_change_rerenders() {
        let (mut session, recorder, _) = session();
        let matched = session.set_end(Some(ym("2016-12"))).unwrap().matched;
        assert_eq!(matched, 2);

        let matched = session.set_severity(Some(Severity::Moderate)).unwrap().matched;
        assert_eq!(matched, 1);
        assert_eq!(recorder.calls.borrow().len(), 3);
    }

    #[test]
    fn invalid_change_leaves_charts_untouched() {
        let (mut session, recorder, notifier) = session();
        let before = session.last_report().clone();

        let err = session.set_start(Some(ym("2018-01"))).unwrap_err();

        assert_eq!(
            err,
            FilterError::InvalidRange {
                start: ym("2018-01"),
                end: ym("2017-01"),
            }
        );
        assert_eq!(session.last_report(), &before);
        assert_eq!(recorder.calls.borrow().len(), 1);
        assert_eq!(notifier.errors.borrow().len(), 1);
        assert!(session.marks().start && session.marks().end);
        assert_eq!(session.pending().start, Some(ym("2018-01")));
        assert_eq!(session.applied().state().start, Some(ym("2016-01")));
    }

    #[test]
    fn severity_change_is_rejected_while_range_is_invalid() {
        let (mut session, recorder, _) = session();
        assert!(session.set_end(Some(ym("2015-12"))).is_err());
        assert!(session.set_severity(Some(Severity::Severe)).is_err());
        assert_eq!(recorder.calls.borrow().len(), 1);
    }

    #[test]
    fn correcting_the_range_clears_marks() {
        let (mut session, _, _) = session();
        assert!(session.set_start(Some(ym("2018-01"))).is_err());
        assert!(session.set_start(Some(ym("2016-06"))).is_ok());
        assert!(!session.marks().any());
        assert_eq!(session.last_report().matched, 2);
    }

    #[test]
    fn reset_restores_defaults_and_clears_marks() {
        let (mut session, _, _) = session();
        session.set_severity(Some(Severity::Severe)).unwrap();
        assert!(session.set_start(Some(ym("2018-01"))).is_err());

        let report = session.reset();
        assert_eq!(report.matched, 3);
        assert!(!session.marks().any());
        assert_eq!(session.pending(), &session.store().default_filter());
        assert_eq!(session.applied().state(), session.pending());
    }

    #[test]
    fn log_notifier_rejects_without_panicking() {
        let store = RecordStore::new(vec![record("2016-01-15 08:00:00", "CA", 2)]);
        let dispatcher = Dispatcher::new(DashboardConfig::default());
        let mut session = Session::start(store, dispatcher, Box::new(LogNotifier));

        assert!(session.dispatcher().is_empty());
        assert!(session.set_end(Some(ym("2015-01"))).is_err());
        assert!(session.marks().any());
    }

    #[test]
    fn severity_options_include_any() {
        let (session, _, _) = session();
        let options = session.available_severities();
        assert_eq!(options.len(), 5);
        assert_eq!(options[0], None);
        assert_eq!(options[4], Some(Severity::Severe));
    }
}
