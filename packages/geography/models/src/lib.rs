#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US state name and postal abbreviation lookups.
//!
//! Accident records identify states by their two-letter postal code, while
//! the boundary `GeoJSON` used by the heatmap names them in full. The
//! [`states`] table bridges the two.

pub mod states;

use serde::{Deserialize, Serialize};

/// A state boundary feature, stripped of its geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBoundary {
    /// Full state name from the feature's `NAME` property.
    pub name: String,
    /// Two-letter postal abbreviation, `None` if the name is not one of
    /// the 50 states (e.g. "District of Columbia", "Puerto Rico").
    pub abbreviation: Option<String>,
}

impl StateBoundary {
    /// Builds a boundary for the given feature name, resolving its
    /// abbreviation through [`states::name_to_abbr`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: states::name_to_abbr(name).map(str::to_string),
        }
    }
}
