//! Map command implementation

use crate::cli::MapArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use pitstop_core::dashboard::Dashboard;
use pitstop_core::map::Viewport;
use tabled::Tabled;

#[derive(Tabled)]
struct LayerRow {
    #[tabled(rename = "Layer")]
    name: String,
    #[tabled(rename = "Features")]
    features: usize,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Fits View")]
    zoom_to_layer: bool,
}

pub async fn execute(args: MapArgs, dashboard: &Dashboard, output: &OutputWriter) -> Result<()> {
    let map = dashboard.map(args.circuit.as_deref(), args.basemap).await?;

    if output.is_json() {
        output.result(&map)?;
        return Ok(());
    }

    output.section("Basemap");
    output.kv("Style", map.basemap);
    output.kv("Tiles", map.tiles.url_template);
    output.kv("Attribution", map.tiles.attribution);
    output.kv("Size", format!("{}x{} px", map.width, map.height));

    output.section("Layers");
    let rows: Vec<LayerRow> = map
        .layers
        .iter()
        .map(|layer| LayerRow {
            name: layer.name.clone(),
            features: layer.feature_count(),
            color: layer.style.color.clone(),
            zoom_to_layer: layer.zoom_to_layer,
        })
        .collect();
    output.table(rows);

    output.section("Viewport");
    match map.viewport {
        Viewport::Fit { bounds: [[south, west], [north, east]] } => {
            output.kv("South-west", format!("{:.4}, {:.4}", south, west));
            output.kv("North-east", format!("{:.4}, {:.4}", north, east));
        }
        Viewport::World => output.kv("Extent", "whole world"),
    }

    Ok(())
}
