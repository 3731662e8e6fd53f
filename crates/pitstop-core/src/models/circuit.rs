use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::geometry::{Bounds, Geometry};

/// A race circuit loaded from the circuits GeoJSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit name, taken from the `Name` property
    pub name: String,

    /// Track outline or location; `None` when the feature has no usable geometry
    pub geometry: Option<Geometry>,

    /// All feature properties, including `Name`
    pub properties: Map<String, JsonValue>,
}

impl Circuit {
    pub fn new(name: impl Into<String>, geometry: Option<Geometry>) -> Self {
        let name = name.into();
        let mut properties = Map::new();
        properties.insert("Name".to_string(), JsonValue::String(name.clone()));
        Self {
            name,
            geometry,
            properties,
        }
    }

    /// Attach an extra descriptive property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String-valued property lookup (e.g. `Location`)
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(JsonValue::as_str)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.geometry.as_ref().and_then(Geometry::bounds)
    }

    /// Convert back into a GeoJSON feature for map layers
    pub fn to_feature(&self) -> geojson::Feature {
        let geometry = self
            .geometry
            .as_ref()
            .and_then(|g| serde_json::from_value::<geojson::Geometry>(g.to_geojson()).ok());

        geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(self.properties.clone()),
            foreign_members: None,
        }
    }
}

/// The circuits dataset, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitTable {
    pub circuits: Vec<Circuit>,
}

impl CircuitTable {
    pub fn new(circuits: Vec<Circuit>) -> Self {
        Self { circuits }
    }

    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circuit> {
        self.circuits.iter()
    }

    /// Every record whose name equals `name` exactly
    pub fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Circuit> + 'a {
        self.circuits.iter().filter(move |c| c.name == name)
    }

    /// Bounding box covering every circuit geometry
    pub fn bounds(&self) -> Option<Bounds> {
        let boxes: Vec<Bounds> = self.circuits.iter().filter_map(Circuit::bounds).collect();
        Bounds::merge_all(&boxes)
    }
}
