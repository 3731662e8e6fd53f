//! The dashboard pipeline.
//!
//! Loader, selector, map, aggregator and presentation run in a straight line on every call. The
//! loader cache is the only state that outlives a run.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::aggregate::{summarize, CircuitSummary};
use crate::config::LayeredConfig;
use crate::error::Result;
use crate::loader::DataLoader;
use crate::map::{render_map, Basemap, MapView};
use crate::models::{CircuitTable, RaceTable};
use crate::ports::DataSource;
use crate::report::{build_report, Header, Report, NO_DATA_MESSAGE};
use crate::selector::{circuit_names, Selection};
use crate::sources::{HttpSource, RoutedSource};

/// Build the default data source for a configuration
pub fn build_source(config: &LayeredConfig) -> Result<RoutedSource> {
    let http = match config.http_timeout_secs.value {
        Some(secs) => HttpSource::with_timeout(Duration::from_secs(secs))?,
        None => HttpSource::new(),
    };
    Ok(RoutedSource::new(http))
}

/// User choices for one render
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    pub circuit: Option<String>,
    pub basemap: Option<Basemap>,
}

/// Everything the dashboard shows for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub header: Header,
    pub basemaps: Vec<Basemap>,
    pub basemap: Basemap,
    pub circuits: Vec<String>,
    pub selection: Selection,
    pub report: Option<Report>,
    pub message: Option<String>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.report.is_none()
    }
}

/// Runs the pipeline against a shared loader
#[derive(Debug, Clone)]
pub struct Dashboard {
    loader: Arc<DataLoader>,
    geojson_url: String,
    csv_url: String,
    basemap: Basemap,
}

impl Dashboard {
    pub fn new(loader: Arc<DataLoader>, config: &LayeredConfig) -> Self {
        Self {
            loader,
            geojson_url: config.geojson_url(),
            csv_url: config.csv_url(),
            basemap: config.basemap.value,
        }
    }

    /// Dashboard over the default routed source
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let source: Arc<dyn DataSource> = Arc::new(build_source(config)?);
        Ok(Self::new(Arc::new(DataLoader::new(source)), config))
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    pub fn default_basemap(&self) -> Basemap {
        self.basemap
    }

    /// Load both datasets concurrently
    pub async fn datasets(&self) -> Result<(Arc<CircuitTable>, Arc<RaceTable>)> {
        futures::try_join!(
            self.loader.load_geospatial(&self.geojson_url),
            self.loader.load_tabular(&self.csv_url),
        )
    }

    /// Sorted, de-duplicated circuit names
    pub async fn circuits(&self) -> Result<Vec<String>> {
        let circuits = self.loader.load_geospatial(&self.geojson_url).await?;
        Ok(circuit_names(&circuits))
    }

    /// Per-circuit aggregates for the requested (or first) circuit
    pub async fn summary(&self, circuit: Option<&str>) -> Result<CircuitSummary> {
        let (circuits, races) = self.datasets().await?;
        let selection = Selection::resolve(&circuit_names(&circuits), circuit);
        Ok(summarize(&races, selection.require()?))
    }

    /// Map description for the requested (or first) circuit
    pub async fn map(&self, circuit: Option<&str>, basemap: Option<Basemap>) -> Result<MapView> {
        let circuits = self.loader.load_geospatial(&self.geojson_url).await?;
        let selection = Selection::resolve(&circuit_names(&circuits), circuit);
        let selected = selection.require()?;
        Ok(render_map(basemap.unwrap_or(self.basemap), &circuits, Some(selected)))
    }

    /// Run the whole pipeline. An empty circuit list produces a view without a report.
    pub async fn render(&self, request: &DashboardRequest) -> Result<DashboardView> {
        let (circuits, races) = self.datasets().await?;
        let names = circuit_names(&circuits);
        let selection = Selection::resolve(&names, request.circuit.as_deref());
        let basemap = request.basemap.unwrap_or(self.basemap);

        let (report, message) = match selection.circuit() {
            Some(selected) => {
                let map = render_map(basemap, &circuits, Some(selected));
                let summary = summarize(&races, selected);
                (Some(build_report(map, &summary)), None)
            }
            None => {
                tracing::warn!(location = %self.geojson_url, "Circuit dataset has no named circuits");
                (None, Some(NO_DATA_MESSAGE.to_string()))
            }
        };

        tracing::info!(
            circuit = ?selection.circuit(),
            basemap = %basemap,
            circuits = names.len(),
            "Rendered dashboard"
        );

        Ok(DashboardView {
            header: Header::default(),
            basemaps: Basemap::ALL.to_vec(),
            basemap,
            circuits: names,
            selection,
            report,
            message,
        })
    }
}
