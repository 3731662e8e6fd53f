//! Map composition.
//!
//! Builds a serializable description of the dashboard map: a tiled basemap, an overlay with every
//! circuit, and a highlighted overlay for the selected circuit. Drawing is left to the client-side
//! map library; this module only decides what goes on the map and where the view starts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PitstopError, Result};
use crate::models::{Bounds, Circuit, CircuitTable};

/// Layer name for the all-circuits overlay
pub const CIRCUITS_LAYER: &str = "circuits";
/// Layer name for the highlighted selection overlay
pub const SELECTED_LAYER: &str = "selected";

/// Map widget size in pixels
pub const MAP_WIDTH: u32 = 600;
pub const MAP_HEIGHT: u32 = 600;

/// Background map style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Basemap {
    #[default]
    #[serde(rename = "OpenStreetMap")]
    OpenStreetMap,
    #[serde(rename = "Stamen Terrain")]
    StamenTerrain,
    #[serde(rename = "Stamen Toner")]
    StamenToner,
}

impl Basemap {
    pub const ALL: [Basemap; 3] = [Basemap::OpenStreetMap, Basemap::StamenTerrain, Basemap::StamenToner];

    pub fn display_name(&self) -> &'static str {
        match self {
            Basemap::OpenStreetMap => "OpenStreetMap",
            Basemap::StamenTerrain => "Stamen Terrain",
            Basemap::StamenToner => "Stamen Toner",
        }
    }

    /// Tile source for this style
    pub fn tiles(&self) -> TileSource {
        match self {
            Basemap::OpenStreetMap => TileSource {
                url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "&copy; OpenStreetMap contributors",
                max_zoom: 19,
            },
            Basemap::StamenTerrain => TileSource {
                url_template: "https://tiles.stadiamaps.com/tiles/stamen_terrain/{z}/{x}/{y}{r}.png",
                attribution: "&copy; Stadia Maps &copy; Stamen Design &copy; OpenStreetMap contributors",
                max_zoom: 18,
            },
            Basemap::StamenToner => TileSource {
                url_template: "https://tiles.stadiamaps.com/tiles/stamen_toner/{z}/{x}/{y}{r}.png",
                attribution: "&copy; Stadia Maps &copy; Stamen Design &copy; OpenStreetMap contributors",
                max_zoom: 20,
            },
        }
    }
}

impl fmt::Display for Basemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Basemap {
    type Err = PitstopError;

    /// Accepts display names and loose variants such as `osm`, `stamen-terrain` or `toner`
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "openstreetmap" | "osm" | "street" => Ok(Basemap::OpenStreetMap),
            "stamenterrain" | "terrain" => Ok(Basemap::StamenTerrain),
            "stamentoner" | "toner" => Ok(Basemap::StamenToner),
            _ => Err(PitstopError::ConfigInvalid {
                key: "basemap".to_string(),
                reason: format!(
                    "Unknown basemap '{}'. Use OpenStreetMap, Stamen Terrain, or Stamen Toner",
                    s
                ),
            }),
        }
    }
}

/// Raster tile endpoint for a basemap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

/// Path styling understood by the client map library
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    pub weight: f64,
}

impl LayerStyle {
    /// Light teal, translucent fill, hairline stroke
    pub fn all_circuits() -> Self {
        Self {
            color: "#7fcdbb".to_string(),
            fill: true,
            fill_opacity: Some(0.3),
            weight: 0.5,
        }
    }

    /// Red outline, no fill
    pub fn selected_circuit() -> Self {
        Self {
            color: "red".to_string(),
            fill: false,
            fill_opacity: None,
            weight: 2.0,
        }
    }
}

/// Styling applied while the pointer is over a feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverStyle {
    pub fill_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self { fill_opacity: 0.7 }
    }
}

/// One GeoJSON overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub name: String,
    pub data: geojson::FeatureCollection,
    pub style: LayerStyle,
    pub hover_style: HoverStyle,
    /// Whether the view should fit this layer
    pub zoom_to_layer: bool,
}

impl MapLayer {
    fn from_circuits<'a>(
        name: &str,
        circuits: impl IntoIterator<Item = &'a Circuit>,
        style: LayerStyle,
        zoom_to_layer: bool,
    ) -> Self {
        let features = circuits.into_iter().map(Circuit::to_feature).collect();
        Self {
            name: name.to_string(),
            data: geojson::FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
            style,
            hover_style: HoverStyle::default(),
            zoom_to_layer,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.data.features.len()
    }
}

/// Map widget controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapControls {
    pub layers_control: bool,
    pub draw_control: bool,
    pub measure_control: bool,
    pub fullscreen_control: bool,
}

impl Default for MapControls {
    fn default() -> Self {
        Self {
            layers_control: true,
            draw_control: false,
            measure_control: false,
            fullscreen_control: false,
        }
    }
}

/// Initial map extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    /// Fit `[[south, west], [north, east]]`
    Fit { bounds: [[f64; 2]; 2] },
    /// Whole-world default view
    World,
}

impl Viewport {
    fn fit(bounds: Bounds) -> Self {
        Viewport::Fit {
            bounds: bounds.to_lat_lng_corners(),
        }
    }
}

/// Everything the client needs to draw the dashboard map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub basemap: Basemap,
    pub tiles: TileSource,
    pub controls: MapControls,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<MapLayer>,
    pub viewport: Viewport,
}

impl MapView {
    pub fn layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.name == name)
    }
}

/// Compose the map for a basemap and an optional selected circuit
///
/// The selected layer drives the viewport. When it is empty (no selection, or a name with no
/// matching record) the view falls back to the extent of every circuit, then to the world.
pub fn render_map(basemap: Basemap, circuits: &CircuitTable, selected: Option<&str>) -> MapView {
    let all_layer = MapLayer::from_circuits(
        CIRCUITS_LAYER,
        circuits.iter(),
        LayerStyle::all_circuits(),
        false,
    );

    let matches: Vec<&Circuit> = match selected {
        Some(name) => circuits.matching(name).collect(),
        None => Vec::new(),
    };
    let selected_bounds: Vec<Bounds> = matches.iter().filter_map(|c| c.bounds()).collect();
    let selected_layer = MapLayer::from_circuits(
        SELECTED_LAYER,
        matches.iter().copied(),
        LayerStyle::selected_circuit(),
        true,
    );

    let viewport = Bounds::merge_all(&selected_bounds)
        .or_else(|| circuits.bounds())
        .map(Viewport::fit)
        .unwrap_or(Viewport::World);

    tracing::debug!(
        basemap = %basemap,
        selected = ?selected,
        selected_features = selected_layer.feature_count(),
        "Composed map"
    );

    MapView {
        basemap,
        tiles: basemap.tiles(),
        controls: MapControls::default(),
        width: MAP_WIDTH,
        height: MAP_HEIGHT,
        layers: vec![all_layer, selected_layer],
        viewport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Geometry;

    fn circuits() -> CircuitTable {
        CircuitTable::new(vec![
            Circuit::new(
                "Silverstone Circuit",
                Some(Geometry::line_string(vec![[-1.02, 52.07], [-1.01, 52.08]])),
            ),
            Circuit::new(
                "Suzuka Circuit",
                Some(Geometry::line_string(vec![[136.53, 34.84], [136.54, 34.85]])),
            ),
        ])
    }

    #[test]
    fn test_basemap_parsing() {
        assert_eq!("OpenStreetMap".parse::<Basemap>().unwrap(), Basemap::OpenStreetMap);
        assert_eq!("osm".parse::<Basemap>().unwrap(), Basemap::OpenStreetMap);
        assert_eq!("Stamen Terrain".parse::<Basemap>().unwrap(), Basemap::StamenTerrain);
        assert_eq!("stamen-toner".parse::<Basemap>().unwrap(), Basemap::StamenToner);
        assert_eq!("TONER".parse::<Basemap>().unwrap(), Basemap::StamenToner);
        assert!("satellite".parse::<Basemap>().is_err());
    }

    #[test]
    fn test_basemap_display_round_trips() {
        for basemap in Basemap::ALL {
            assert_eq!(basemap.to_string().parse::<Basemap>().unwrap(), basemap);
        }
    }

    #[test]
    fn test_layers_and_styles() {
        let map = render_map(Basemap::StamenTerrain, &circuits(), Some("Suzuka Circuit"));

        let all = map.layer(CIRCUITS_LAYER).unwrap();
        assert_eq!(all.feature_count(), 2);
        assert!(!all.zoom_to_layer);
        assert_eq!(all.style.color, "#7fcdbb");
        assert_eq!(all.style.fill_opacity, Some(0.3));

        let selected = map.layer(SELECTED_LAYER).unwrap();
        assert_eq!(selected.feature_count(), 1);
        assert!(selected.zoom_to_layer);
        assert_eq!(selected.style.color, "red");
        assert!(!selected.style.fill);
        assert_eq!(selected.hover_style.fill_opacity, 0.7);

        assert!(map.tiles.url_template.contains("stamen_terrain"));
        assert!(map.controls.layers_control);
        assert!(!map.controls.draw_control);
    }

    #[test]
    fn test_viewport_fits_selection() {
        let map = render_map(Basemap::OpenStreetMap, &circuits(), Some("Silverstone Circuit"));
        assert_eq!(
            map.viewport,
            Viewport::Fit {
                bounds: [[52.07, -1.02], [52.08, -1.01]]
            }
        );
    }

    #[test]
    fn test_unknown_selection_falls_back_to_full_extent() {
        let map = render_map(Basemap::OpenStreetMap, &circuits(), Some("Kyalami"));

        assert_eq!(map.layer(SELECTED_LAYER).unwrap().feature_count(), 0);
        assert_eq!(
            map.viewport,
            Viewport::Fit {
                bounds: [[34.84, -1.02], [52.08, 136.54]]
            }
        );
    }

    #[test]
    fn test_no_geometry_falls_back_to_world() {
        let table = CircuitTable::new(vec![Circuit::new("Ghost Ring", None)]);
        let map = render_map(Basemap::OpenStreetMap, &table, Some("Ghost Ring"));

        assert_eq!(map.layer(SELECTED_LAYER).unwrap().feature_count(), 1);
        assert_eq!(map.viewport, Viewport::World);
    }

    #[test]
    fn test_serialized_style_uses_client_names() {
        let json = serde_json::to_value(LayerStyle::all_circuits()).unwrap();
        assert_eq!(json["fillOpacity"], 0.3);
        assert!(serde_json::to_value(LayerStyle::selected_circuit()).unwrap().get("fillOpacity").is_none());
    }
}
