#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US state boundary loading for the accident heatmap.
//!
//! Reads a `GeoJSON` `FeatureCollection` of state polygons once at startup
//! and resolves each feature's `properties.NAME` to a postal abbreviation.
//! Geometry is kept untouched so renderers can draw it; nothing in the
//! aggregation path inspects it.

use std::path::Path;

use accident_dash_geography_models::StateBoundary;
use geojson::{GeoJson, Geometry};
use thiserror::Error;

/// Errors that can occur while loading state boundaries.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading the boundary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

/// One state feature: its resolved names and its geometry.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    /// Name and abbreviation.
    pub boundary: StateBoundary,
    /// Feature geometry, if the feature has one.
    pub geometry: Option<Geometry>,
}

/// All state features from a boundary file, in file order.
#[derive(Debug, Clone, Default)]
pub struct StateBoundaries {
    features: Vec<BoundaryFeature>,
}

impl StateBoundaries {
    /// Loads boundaries from a `GeoJSON` file.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be read or is not a
    /// `FeatureCollection`.
    pub async fn load(path: &Path) -> Result<Self, GeoError> {
        log::info!("Loading state boundaries from {}", path.display());
        let text = tokio::fs::read_to_string(path).await?;
        let boundaries = Self::from_geojson_str(&text)?;
        log::info!(
            "Loaded {} state features ({} unmatched)",
            boundaries.features.len(),
            boundaries.unmatched().count()
        );
        Ok(boundaries)
    }

    /// Parses boundaries from `GeoJSON` text.
    ///
    /// Features without a string `NAME` property are kept with an empty
    /// name so they still render.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the text is not a `FeatureCollection`.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeoError> {
        let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
            return Err(GeoError::NotFeatureCollection);
        };

        let features = collection
            .features
            .into_iter()
            .map(|feature| {
                let name = feature
                    .property("NAME")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();
                BoundaryFeature {
                    boundary: StateBoundary::from_name(name),
                    geometry: feature.geometry,
                }
            })
            .collect();

        Ok(Self { features })
    }

    /// All features, in file order.
    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Names and abbreviations of every feature, geometry dropped. This is
    /// what the heatmap aggregate is computed over.
    #[must_use]
    pub fn boundaries(&self) -> Vec<StateBoundary> {
        self.features.iter().map(|f| f.boundary.clone()).collect()
    }

    /// Features whose name is not in the state table.
    pub fn unmatched(&self) -> impl Iterator<Item = &BoundaryFeature> {
        self.features
            .iter()
            .filter(|f| f.boundary.abbreviation.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "California" },
                "geometry": { "type": "Point", "coordinates": [-119.4, 36.7] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Puerto Rico" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn resolves_feature_names() {
        let boundaries = StateBoundaries::from_geojson_str(SAMPLE).unwrap();
        let features = boundaries.features();

        assert_eq!(features.len(), 3);
        assert_eq!(features[0].boundary.name, "California");
        assert_eq!(features[0].boundary.abbreviation.as_deref(), Some("CA"));
        assert!(features[0].geometry.is_some());
        assert_eq!(features[1].boundary.abbreviation, None);
        assert_eq!(features[2].boundary.name, "");
        assert_eq!(boundaries.unmatched().count(), 2);

        let names: Vec<String> = boundaries.boundaries().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["California", "Puerto Rico", ""]);
    }

    #[test]
    fn rejects_non_collections() {
        let single = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(matches!(
            StateBoundaries::from_geojson_str(single),
            Err(GeoError::NotFeatureCollection)
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            StateBoundaries::from_geojson_str("{ nope"),
            Err(GeoError::GeoJson(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let result = StateBoundaries::load(Path::new("/nonexistent/us-states.geojson")).await;
        assert!(matches!(result, Err(GeoError::Io(_))));
    }
}
