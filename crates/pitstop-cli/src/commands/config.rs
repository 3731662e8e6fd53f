//! Config command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use pitstop_core::config::{ConfigSource, LayeredConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct ConfigEntry {
    value: String,
    source: ConfigSource,
}

#[derive(Debug, Serialize)]
struct ConfigOutput {
    values: BTreeMap<String, ConfigEntry>,
    geojson_url: String,
    csv_url: String,
}

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    // Sorted for consistent output
    let values: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
        .collect();

    if output.is_json() {
        output.result(ConfigOutput {
            values,
            geojson_url: config.geojson_url(),
            csv_url: config.csv_url(),
        })?;
        return Ok(());
    }

    output.section("Configuration Values");
    let rows: Vec<ConfigRow> = values
        .into_iter()
        .map(|(key, entry)| ConfigRow {
            key,
            value: entry.value,
            source: format!("{:?}", entry.source),
        })
        .collect();
    output.table(rows);

    output.section("Dataset Locations");
    output.kv("Circuits", config.geojson_url());
    output.kv("Race results", config.csv_url());

    output.section("Configuration Precedence");
    output.info("CLI arguments > Environment variables > Config file > Defaults");

    Ok(())
}
