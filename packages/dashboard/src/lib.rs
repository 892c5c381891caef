#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record store, filter engine, aggregators and render dispatch for the
//! accident dashboard.
//!
//! The pipeline is: a [`store::RecordStore`] loaded once, a
//! [`FilterState`](accident_dash_dashboard_models::FilterState) validated
//! into a [`ValidatedFilter`](accident_dash_dashboard_models::ValidatedFilter),
//! [`filter::apply`] producing a [`filter::FilteredView`], and a
//! [`dispatch::Dispatcher`] that turns that view into one aggregate per
//! registered chart and hands it to the chart's [`dispatch::Renderer`].
//! [`session::Session`] wraps all of it behind the operations a set of
//! filter controls needs.

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod filter;
pub mod progress;
pub mod session;
pub mod store;

use thiserror::Error;

/// Errors that can occur while loading the record store. All of them are
/// fatal: no chart can render without the dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the dataset file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching the dataset over HTTP failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The dataset is not a JSON array of valid records.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset parsed but contains no records.
    #[error("Dataset contains no records")]
    Empty,
}

/// Errors a renderer can report. Dispatch logs them and carries on with
/// the remaining charts.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the aggregate failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The renderer received an aggregate it cannot draw.
    #[error("Render error: {message}")]
    Message {
        /// Description of what went wrong.
        message: String,
    },
}

/// Errors that can occur while loading dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or does not match the schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The config parsed but a value is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of the offending value.
        message: String,
    },
}
