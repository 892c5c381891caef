//! Render dispatch.
//!
//! A [`Dispatcher`] owns every registered chart: a [`ChartKind`] paired
//! with the [`Renderer`] that draws it. Each cycle filters the store once,
//! then computes and renders every chart from that single view.

use accident_dash_dashboard_models::{ChartAggregate, ChartKind, FilterState, ValidatedFilter};
use accident_dash_geography_models::{StateBoundary, states};

use crate::RenderError;
use crate::aggregate;
use crate::config::DashboardConfig;
use crate::filter::{self, FilteredView};
use crate::store::RecordStore;

/// Draws one chart from its aggregate.
///
/// Called unconditionally on every cycle; implementations clear whatever
/// they drew last time before drawing again.
pub trait Renderer {
    /// Renders `aggregate` as chart `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if drawing fails. The error is reported but
    /// does not stop the other charts.
    fn render(&mut self, kind: ChartKind, aggregate: &ChartAggregate) -> Result<(), RenderError>;
}

/// Static inputs every aggregate may need besides the view itself.
pub struct ChartContext<'a> {
    /// Chart configuration.
    pub config: &'a DashboardConfig,
    /// Year axis of the dense per-year charts.
    pub year_span: &'a [i32],
    /// Boundary features for the heatmap.
    pub boundaries: &'a [StateBoundary],
}

/// Computes the aggregate a chart kind draws.
#[must_use]
pub fn compute(kind: ChartKind, view: &FilteredView<'_>, ctx: &ChartContext<'_>) -> ChartAggregate {
    let config = ctx.config;
    match kind {
        ChartKind::TopStatesBar | ChartKind::TopStatesPie => {
            ChartAggregate::TopStates(aggregate::top_states(view, config.top_states.limit))
        }
        ChartKind::SeverityTrend => {
            ChartAggregate::YearSeverity(aggregate::year_severity(view, ctx.year_span))
        }
        ChartKind::StatesByYear => ChartAggregate::YearStates(aggregate::year_state_grouped(
            view,
            config.states_by_year.top,
            &config.states_by_year.years(),
        )),
        ChartKind::RoadFeatureSeverity => ChartAggregate::FeatureSeverity(
            aggregate::road_feature_severity(view, &config.road_features.stacked),
        ),
        ChartKind::RoadFeatureTrend => ChartAggregate::YearFeature(aggregate::year_feature(
            view,
            &config.road_features.trend,
            ctx.year_span,
        )),
        ChartKind::SeverityDistribution => {
            ChartAggregate::Severities(aggregate::severity_distribution(view))
        }
        ChartKind::TopWeather => {
            ChartAggregate::TopLabels(aggregate::top_weather(view, config.weather.limit))
        }
        ChartKind::StateHeatmap => ChartAggregate::Choropleth(aggregate::state_choropleth(
            view,
            ctx.boundaries,
            &config.heatmap,
        )),
    }
}

/// What happened during one dispatch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The filter the cycle ran with.
    pub filter: FilterState,
    /// Number of records in the filtered view.
    pub matched: usize,
    /// Charts rendered successfully, in registration order.
    pub rendered: Vec<ChartKind>,
    /// Charts whose renderer failed, with the error message.
    pub failed: Vec<(ChartKind, String)>,
}

/// Registered charts plus the configuration they aggregate with.
pub struct Dispatcher {
    config: DashboardConfig,
    boundaries: Vec<StateBoundary>,
    charts: Vec<(ChartKind, Box<dyn Renderer>)>,
}

impl Dispatcher {
    /// Creates a dispatcher with no charts.
    ///
    /// Until [`Self::with_boundaries`] is called, the heatmap uses one
    /// geometry-less boundary per state of the built-in table.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let boundaries = states::STATES
            .iter()
            .map(|(name, _)| StateBoundary::from_name(name))
            .collect();

        Self {
            config,
            boundaries,
            charts: Vec::new(),
        }
    }

    /// Replaces the heatmap's boundary features.
    #[must_use]
    pub fn with_boundaries(mut self, boundaries: Vec<StateBoundary>) -> Self {
        self.boundaries = boundaries;
        self
    }

    /// Registers a renderer for a chart kind. The same kind may be
    /// registered more than once (e.g. terminal and file output).
    pub fn register(&mut self, kind: ChartKind, renderer: Box<dyn Renderer>) {
        self.charts.push((kind, renderer));
    }

    /// Number of registered charts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// Whether no chart is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Filters the store once and renders every registered chart.
    pub fn dispatch(&mut self, store: &RecordStore, filter: &ValidatedFilter) -> DispatchReport {
        let view = filter::apply(store, filter);
        let year_span = store.year_span();

        let ctx = ChartContext {
            config: &self.config,
            year_span: &year_span,
            boundaries: &self.boundaries,
        };

        let mut report = DispatchReport {
            filter: *filter.state(),
            matched: view.len(),
            ..DispatchReport::default()
        };

        for (kind, renderer) in &mut self.charts {
            let aggregate = compute(*kind, &view, &ctx);
            match renderer.render(*kind, &aggregate) {
                Ok(()) => report.rendered.push(*kind),
                Err(e) => {
                    log::error!("Failed to render {kind}: {e}");
                    report.failed.push((*kind, e.to_string()));
                }
            }
        }

        log::debug!(
            "Dispatched {} charts over {} records ({} failed)",
            report.rendered.len() + report.failed.len(),
            report.matched,
            report.failed.len()
        );

        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::tests::record;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every aggregate it is asked to render.
    #[derive(Clone, Default)]
    pub struct RecordingRenderer {
        pub calls: Rc<RefCell<Vec<(ChartKind, ChartAggregate)>>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, kind: ChartKind, aggregate: &ChartAggregate) -> Result<(), RenderError> {
            self.calls.borrow_mut().push((kind, aggregate.clone()));
            Ok(())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&mut self, _kind: ChartKind, _aggregate: &ChartAggregate) -> Result<(), RenderError> {
            Err(RenderError::Message {
                message: "canvas unavailable".to_string(),
            })
        }
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            record("2016-01-15 08:00:00", "CA", 2),
            record("2016-06-03 17:30:00", "CA", 4),
            record("2017-01-02 12:00:00", "TX", 2),
        ])
    }

    #[test]
    fn renders_every_registered_chart() {
        let recorder = RecordingRenderer::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        for kind in ChartKind::all() {
            dispatcher.register(*kind, Box::new(recorder.clone()));
        }

        let store = store();
        let report = dispatcher.dispatch(&store, &ValidatedFilter::unconstrained());

        assert_eq!(report.matched, 3);
        assert_eq!(report.rendered, ChartKind::all().to_vec());
        assert!(report.failed.is_empty());
        assert_eq!(recorder.calls.borrow().len(), ChartKind::all().len());
    }

    #[test]
    fn bar_and_pie_share_the_top_states_aggregate() {
        let recorder = RecordingRenderer::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        dispatcher.register(ChartKind::TopStatesBar, Box::new(recorder.clone()));
        dispatcher.register(ChartKind::TopStatesPie, Box::new(recorder.clone()));

        dispatcher.dispatch(&store(), &ValidatedFilter::unconstrained());

        let calls = recorder.calls.borrow();
        assert_eq!(calls[0].1, calls[1].1);
        assert!(matches!(&calls[0].1, ChartAggregate::TopStates(top) if top[0].state == "CA"));
    }

    #[test]
    fn failing_renderer_does_not_stop_others() {
        let recorder = RecordingRenderer::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        dispatcher.register(ChartKind::SeverityTrend, Box::new(FailingRenderer));
        dispatcher.register(ChartKind::TopStatesBar, Box::new(recorder.clone()));

        let report = dispatcher.dispatch(&store(), &ValidatedFilter::unconstrained());

        assert_eq!(report.rendered, vec![ChartKind::TopStatesBar]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ChartKind::SeverityTrend);
        assert_eq!(recorder.calls.borrow().len(), 1);
    }

    #[test]
    fn empty_view_still_renders() {
        let recorder = RecordingRenderer::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        for kind in ChartKind::all() {
            dispatcher.register(*kind, Box::new(recorder.clone()));
        }

        let filter = FilterState {
            start: Some("2030-01".parse().unwrap()),
            end: None,
            severity: None,
        }
        .validate()
        .unwrap();
        let report = dispatcher.dispatch(&store(), &filter);

        assert_eq!(report.matched, 0);
        assert!(report.failed.is_empty());
        assert!(recorder.calls.borrow().iter().all(|(_, a)| a.is_empty()));
    }

    #[test]
    fn default_heatmap_covers_every_state() {
        let recorder = RecordingRenderer::default();
        let mut dispatcher = Dispatcher::new(DashboardConfig::default());
        dispatcher.register(ChartKind::StateHeatmap, Box::new(recorder.clone()));

        dispatcher.dispatch(&store(), &ValidatedFilter::unconstrained());

        let calls = recorder.calls.borrow();
        let ChartAggregate::Choropleth(map) = &calls[0].1 else {
            panic!("expected choropleth, got {:?}", calls[0].1);
        };
        assert_eq!(map.cells.len(), 50);
        let ca = map
            .cells
            .iter()
            .find(|c| c.boundary.abbreviation.as_deref() == Some("CA"))
            .unwrap();
        assert_eq!(ca.count, 2);
    }
}
