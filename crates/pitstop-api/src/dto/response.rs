use pitstop_core::map::{Basemap, TileSource};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub cached_datasets: usize,
}

impl HealthResponse {
    pub fn new(cached_datasets: usize) -> Self {
        Self { status: "ok", service: "pitstop-api", cached_datasets }
    }
}

/// Circuit list response
#[derive(Debug, Serialize)]
pub struct CircuitsResponse {
    pub circuits: Vec<String>,
    pub count: usize,
}

impl CircuitsResponse {
    pub fn new(circuits: Vec<String>) -> Self {
        let count = circuits.len();
        Self { circuits, count }
    }
}

/// One selectable basemap
#[derive(Debug, Serialize)]
pub struct BasemapInfo {
    pub name: Basemap,
    pub tiles: TileSource,
    pub default: bool,
}

impl BasemapInfo {
    pub fn new(basemap: Basemap, default: Basemap) -> Self {
        Self {
            name: basemap,
            tiles: basemap.tiles(),
            default: basemap == default,
        }
    }
}
