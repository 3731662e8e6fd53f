//! Circuit geometry types.
//!
//! These types bridge GeoJSON serialization and the computational `geo` crate types, which the
//! map composer uses to work out viewports.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::Geometry as GeoGeometry;
use serde::{Deserialize, Serialize};

/// GeoJSON-compatible geometry representation
///
/// This enum directly maps to GeoJSON geometry types with coordinate arrays.
/// It can be serialized/deserialized as GeoJSON and converted to `geo` crate types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    ///
    /// Returns `None` for geometry collections and anything carrying more than two ordinates
    /// per position that cannot be narrowed.
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(strip_extra_ordinates(value)).ok()
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Convert to a `geo` geometry for computation
    pub fn to_geo(&self) -> GeoGeometry {
        match self {
            Geometry::Point { coordinates } => {
                GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
            }
            Geometry::LineString { coordinates } => GeoGeometry::LineString(line(coordinates)),
            Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
            Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
                coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
            )),
            Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
                geo::MultiLineString::new(coordinates.iter().map(|l| line(l)).collect()),
            ),
            Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(
                geo::MultiPolygon::new(coordinates.iter().map(|p| polygon(p)).collect()),
            ),
        }
    }

    /// Bounding box of this geometry, `None` when it has no coordinates
    pub fn bounds(&self) -> Option<Bounds> {
        self.to_geo().bounding_rect().map(|rect| Bounds {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        })
    }
}

fn line(coordinates: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(coordinates.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => {
            geo::Polygon::new(line(exterior), interiors.iter().map(|r| line(r)).collect())
        }
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Drop altitude (and any further ordinates) so `[lon, lat, alt]` positions fit `[f64; 2]`
fn strip_extra_ordinates(value: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Array(items) if items.len() > 2 && items.iter().all(Value::is_number) => {
            Value::Array(items[..2].to_vec())
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_extra_ordinates).collect()),
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), strip_extra_ordinates(v))).collect(),
        ),
        other => other.clone(),
    }
}

/// Axis-aligned bounding box in WGS 84 (`x` = longitude, `y` = latitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box covering both boxes
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Union of every box in the iterator
    pub fn merge_all<'a>(boxes: impl IntoIterator<Item = &'a Bounds>) -> Option<Bounds> {
        boxes.into_iter().fold(None, |acc, b| match acc {
            Some(a) => Some(b.union(&a)),
            None => Some(*b),
        })
    }

    /// Leaflet-style `[[south, west], [north, east]]` corner pair
    pub fn to_lat_lng_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_y, self.min_x], [self.max_y, self.max_x]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_serialization() {
        let point = Geometry::point(7.4206, 43.7347);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("Point"));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(point, parsed);
    }

    #[test]
    fn test_from_geojson_drops_altitude() {
        let value = serde_json::json!({
            "type": "LineString",
            "coordinates": [[5.0, 50.0, 400.0], [6.0, 51.0, 410.0]]
        });

        let geometry = Geometry::from_geojson(&value).unwrap();
        assert_eq!(geometry, Geometry::line_string(vec![[5.0, 50.0], [6.0, 51.0]]));
    }

    #[test]
    fn test_line_string_bounds() {
        let track = Geometry::line_string(vec![[5.96, 50.43], [5.97, 50.44], [5.95, 50.45]]);
        let bounds = track.bounds().unwrap();

        assert_eq!(bounds.min_x, 5.95);
        assert_eq!(bounds.max_x, 5.97);
        assert_eq!(bounds.min_y, 50.43);
        assert_eq!(bounds.max_y, 50.45);
    }

    #[test]
    fn test_empty_polygon_has_no_bounds() {
        assert!(Geometry::polygon(vec![]).bounds().is_none());
    }

    #[test]
    fn test_bounds_merge() {
        let a = Bounds { min_x: 0.0, min_y: 0.0, max_x: 1.0, max_y: 1.0 };
        let b = Bounds { min_x: -2.0, min_y: 0.5, max_x: 0.5, max_y: 3.0 };

        let merged = Bounds::merge_all([&a, &b]).unwrap();
        assert_eq!(merged, Bounds { min_x: -2.0, min_y: 0.0, max_x: 1.0, max_y: 3.0 });
        assert!(Bounds::merge_all(std::iter::empty()).is_none());
        assert_eq!(merged.to_lat_lng_corners(), [[0.0, -2.0], [3.0, 1.0]]);
    }
}
