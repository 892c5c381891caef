#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the accident dashboard.
//!
//! With no subcommand (or `interactive`) it renders every chart to the
//! terminal and lets the user change the filter from a menu. `generate`
//! renders every chart once, as JSON files for a static web front-end.
//!
//! Uses `indicatif-log-bridge` (via [`accident_dash_cli_utils::init_logger`])
//! so the dataset progress bar and log lines never fight for the terminal.

mod interactive;
mod render;

use std::path::{Path, PathBuf};

use accident_dash_accident_models::{Severity, YearMonth};
use accident_dash_cli_utils::IndicatifProgress;
use accident_dash_dashboard::config::DashboardConfig;
use accident_dash_dashboard::dispatch::Dispatcher;
use accident_dash_dashboard::store::{DataLocation, RecordStore};
use accident_dash_dashboard_models::{ChartKind, FilterState};
use accident_dash_geography::{GeoError, StateBoundaries};
use accident_dash_geography_models::StateBoundary;
use clap::{Parser, Subcommand};

use crate::render::JsonFileRenderer;

/// Dataset used when neither `--data` nor `ACCIDENTS_DATA` is set.
const DEFAULT_DATA: &str = "data/accidents_cleaned.json";

#[derive(Parser)]
#[command(name = "accident_dash", about = "US traffic accident dashboard")]
struct Cli {
    /// Dataset file or `http(s)` URL (overrides `ACCIDENTS_DATA`)
    #[arg(long, global = true)]
    data: Option<String>,
    /// State boundary `GeoJSON` for the heatmap (overrides `STATES_GEOJSON`)
    #[arg(long, global = true)]
    geo: Option<PathBuf>,
    /// TOML file merged over the built-in chart configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every chart in the terminal and filter interactively
    Interactive,
    /// Render every chart once as JSON files
    Generate {
        /// First period to include, `YYYY-MM` (default: earliest in the data)
        #[arg(long)]
        start: Option<YearMonth>,
        /// Last period to include, `YYYY-MM` (default: latest in the data)
        #[arg(long)]
        end: Option<YearMonth>,
        /// Only include this severity (1-4)
        #[arg(long)]
        severity: Option<u8>,
        /// Output directory
        #[arg(long, default_value = "data/generated")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = accident_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref())?;

    let data: DataLocation = cli
        .data
        .or_else(|| std::env::var("ACCIDENTS_DATA").ok())
        .unwrap_or_else(|| DEFAULT_DATA.to_string())
        .parse()?;
    let geo = cli
        .geo
        .or_else(|| std::env::var_os("STATES_GEOJSON").map(PathBuf::from));

    let progress = IndicatifProgress::load_bar(&multi, "Loading accidents");
    let (store, boundaries) = tokio::join!(
        RecordStore::load(&data, &progress),
        load_boundaries(geo.as_deref())
    );
    let store = store?;
    let boundaries = boundaries?;

    let mut dispatcher = Dispatcher::new(config);
    if let Some(boundaries) = boundaries {
        dispatcher = dispatcher.with_boundaries(boundaries);
    }

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => interactive::run(store, dispatcher)?,
        Commands::Generate {
            start,
            end,
            severity,
            output,
        } => {
            let severity = severity.map(Severity::try_from).transpose()?;
            generate(&store, dispatcher, start, end, severity, &output)?;
        }
    }

    Ok(())
}

/// Loads the heatmap boundaries, or `None` to fall back to the built-in
/// state table.
async fn load_boundaries(path: Option<&Path>) -> Result<Option<Vec<StateBoundary>>, GeoError> {
    let Some(path) = path else {
        log::info!("No boundary GeoJSON given, using the built-in state table");
        return Ok(None);
    };

    let boundaries = StateBoundaries::load(path).await?;
    for feature in boundaries.unmatched() {
        log::debug!("Boundary feature '{}' is not a state", feature.boundary.name);
    }
    Ok(Some(boundaries.boundaries()))
}

/// Renders every chart once into `output` plus a `manifest.json`.
fn generate(
    store: &RecordStore,
    mut dispatcher: Dispatcher,
    start: Option<YearMonth>,
    end: Option<YearMonth>,
    severity: Option<Severity>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = FilterState {
        start: start.or_else(|| store.earliest_period()),
        end: end.or_else(|| store.latest_period()),
        severity,
    }
    .validate()?;

    std::fs::create_dir_all(output)?;
    for kind in ChartKind::all() {
        dispatcher.register(*kind, Box::new(JsonFileRenderer::new(output.to_path_buf())));
    }

    let report = dispatcher.dispatch(store, &filter);

    let manifest = serde_json::json!({
        "filter": report.filter,
        "matched": report.matched,
        "total": store.len(),
        "periods": store.periods(),
        "charts": report.rendered,
        "failed": report.failed,
    });
    let manifest_path = output.join("manifest.json");
    std::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?)?;

    log::info!(
        "Rendered {} charts over {} of {} records into {}",
        report.rendered.len(),
        report.matched,
        store.len(),
        output.display()
    );

    if !report.failed.is_empty() {
        return Err(format!("{} charts failed to render", report.failed.len()).into());
    }
    Ok(())
}
