//! GeoJSON circuit reader

use crate::error::{PitstopError, Result};
use crate::formats::{FormatDataset, FormatReader, FormatValidation};
use crate::models::{Circuit, CircuitTable, Geometry};

/// Property holding the circuit's display name
pub const NAME_PROPERTY: &str = "Name";

/// Reads the circuits FeatureCollection
pub struct CircuitReader;

impl FormatReader for CircuitReader {
    type Output = CircuitTable;

    fn parse(&self, location: &str, content: &str) -> Result<FormatDataset<CircuitTable>> {
        let geojson: geojson::GeoJson = content.parse().map_err(|e| {
            PitstopError::data_unavailable(location, format!("Failed to parse GeoJSON: {}", e))
        })?;

        let features = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc.features,
            geojson::GeoJson::Feature(feature) => vec![feature],
            geojson::GeoJson::Geometry(_) => {
                return Err(PitstopError::data_unavailable(
                    location,
                    "Expected a FeatureCollection of named circuits, found a bare geometry",
                ));
            }
        };

        let mut validation = FormatValidation::default();
        let circuits = features
            .iter()
            .enumerate()
            .filter_map(|(idx, feature)| self.convert_feature(feature, idx, &mut validation))
            .collect();

        Ok(FormatDataset {
            format_name: self.format_name().to_string(),
            data: CircuitTable::new(circuits),
            validation,
        })
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

impl CircuitReader {
    /// Convert a GeoJSON feature to a Circuit, skipping features without a name
    fn convert_feature(
        &self,
        feature: &geojson::Feature,
        idx: usize,
        validation: &mut FormatValidation,
    ) -> Option<Circuit> {
        let properties = feature.properties.clone().unwrap_or_default();

        let Some(name) = properties.get(NAME_PROPERTY).and_then(|v| v.as_str()) else {
            validation
                .warnings
                .push(format!("Feature {} has no string '{}' property; skipped", idx, NAME_PROPERTY));
            return None;
        };
        let name = name.to_string();

        let geometry = match feature.geometry.as_ref() {
            Some(geom) => {
                let converted = serde_json::to_value(geom).ok().and_then(|v| Geometry::from_geojson(&v));
                if converted.is_none() {
                    validation
                        .warnings
                        .push(format!("Circuit '{}' has an unsupported geometry; drawn without it", name));
                }
                converted
            }
            None => None,
        };

        Some(Circuit {
            name,
            geometry,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCUITS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "id": "be-1925", "Location": "Spa Francorchamps", "Name": "Circuit de Spa-Francorchamps", "length": 7004 },
                "geometry": { "type": "LineString", "coordinates": [[5.9714, 50.4457], [5.9680, 50.4420], [5.9630, 50.4370]] }
            },
            {
                "type": "Feature",
                "properties": { "id": "mc-1929", "Location": "Monte Carlo", "Name": "Circuit de Monaco" },
                "geometry": { "type": "LineString", "coordinates": [[7.4286, 43.7347], [7.4250, 43.7380]] }
            },
            {
                "type": "Feature",
                "properties": { "id": "xx-0000" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }
        ]
    }"#;

    #[test]
    fn test_reads_named_circuits() {
        let dataset = CircuitReader.parse("f1-circuits.geojson", CIRCUITS).unwrap();

        assert_eq!(dataset.format_name, "GeoJSON");
        assert_eq!(dataset.data.len(), 2);

        let spa = &dataset.data.circuits[0];
        assert_eq!(spa.name, "Circuit de Spa-Francorchamps");
        assert_eq!(spa.property_str("Location"), Some("Spa Francorchamps"));
        assert!(matches!(spa.geometry, Some(Geometry::LineString { .. })));
    }

    #[test]
    fn test_unnamed_feature_becomes_warning() {
        let dataset = CircuitReader.parse("f1-circuits.geojson", CIRCUITS).unwrap();

        assert_eq!(dataset.validation.warnings.len(), 1);
        assert!(dataset.validation.warnings[0].contains("Feature 2"));
    }

    #[test]
    fn test_feature_without_geometry_is_kept() {
        let content = r#"{
            "type": "Feature",
            "properties": { "Name": "Ghost Ring" },
            "geometry": null
        }"#;

        let dataset = CircuitReader.parse("ghost.geojson", content).unwrap();
        assert_eq!(dataset.data.len(), 1);
        assert!(dataset.data.circuits[0].geometry.is_none());
    }

    #[test]
    fn test_malformed_content_is_data_unavailable() {
        let err = CircuitReader.parse("broken.geojson", "not valid json").unwrap_err();
        assert!(matches!(err, PitstopError::DataUnavailable { ref location, .. } if location == "broken.geojson"));
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let content = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(CircuitReader.parse("point.geojson", content).is_err());
    }
}
