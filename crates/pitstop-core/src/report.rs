//! Presentation view model.
//!
//! Turns the map and a `CircuitSummary` into the ordered blocks the dashboard shows. Formatting
//! only; every number here was computed by the aggregator.

use serde::Serialize;

use crate::aggregate::{CircuitSummary, FastestLap, FinishRate};
use crate::map::MapView;
use crate::pivot::PivotTable;

pub const TITLE: &str = "Formula One - Data Pitstop - 1950 to 2023";
pub const SIDEBAR_TITLE: &str = "About";
pub const SIDEBAR_INFO: &str = "F1 stats and maps for 35 race circuits";
pub const LOADING_STATUS: &str = "Engines revving...";
pub const LOADED_STATUS: &str = "Lights out and away we go ... !";
pub const PODIUM_INTRO: &str =
    "The bar chart below provides a breakdown of the champagne soaked podium finishers : ";
pub const INCIDENT_INTRO: &str = "The bar chart below shows the number of major incidents by year : ";
pub const NO_DATA_MESSAGE: &str = "No circuits are available. The circuit dataset is empty.";

/// One stacked series of a bar chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<u64>,
}

/// A categorical bar chart stacked by series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub stacked: bool,
}

impl BarChart {
    /// Rows become categories, columns become stacked series
    pub fn from_pivot<R, C>(title: impl Into<String>, pivot: &PivotTable<R, C>) -> Self
    where
        R: Ord + Clone + ToString,
        C: Ord + Clone + ToString,
    {
        Self {
            title: title.into(),
            categories: pivot.rows().map(ToString::to_string).collect(),
            series: pivot
                .columns()
                .map(|column| ChartSeries {
                    name: column.to_string(),
                    values: pivot.column_values(column),
                })
                .collect(),
            stacked: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// A dashboard block, in display order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Map { map: Box<MapView> },
    Text { text: String },
    Chart { chart: BarChart },
}

/// Page header shown above the sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    pub sidebar_title: String,
    pub sidebar_info: String,
    pub status: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            title: TITLE.to_string(),
            sidebar_title: SIDEBAR_TITLE.to_string(),
            sidebar_info: SIDEBAR_INFO.to_string(),
            status: LOADED_STATUS.to_string(),
        }
    }
}

/// The rendered dashboard for one circuit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub header: Header,
    pub circuit: String,
    pub sections: Vec<Section>,
}

impl Report {
    /// All text sections, in order
    pub fn sentences(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn charts(&self) -> Vec<&BarChart> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Chart { chart } => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn map(&self) -> Option<&MapView> {
        self.sections.iter().find_map(|s| match s {
            Section::Map { map } => Some(map.as_ref()),
            _ => None,
        })
    }
}

pub fn fastest_lap_sentence(circuit: &str, lap: &FastestLap) -> String {
    format!(
        "The fastest lap time recorded at {} is {}, clocked by {} on {}.",
        circuit,
        lap.time,
        lap.driver,
        lap.date.format("%Y-%m-%d")
    )
}

pub fn finish_rate_sentence(circuit: &str, rate: &FinishRate) -> String {
    format!(
        "From a total of {} drivers who have started a race at {}, {:.2} % completed the race.",
        rate.starters, circuit, rate.percent
    )
}

/// Build the report: map, fastest lap, podium chart, incident chart, finish rate
///
/// Sentences whose data is absent are left out rather than printed empty.
pub fn build_report(map: MapView, summary: &CircuitSummary) -> Report {
    let circuit = summary.circuit.as_str();
    let mut sections = vec![Section::Map { map: Box::new(map) }];

    if let Some(lap) = &summary.fastest_lap {
        sections.push(Section::Text {
            text: fastest_lap_sentence(circuit, lap),
        });
    }

    sections.push(Section::Text {
        text: PODIUM_INTRO.to_string(),
    });
    sections.push(Section::Chart {
        chart: BarChart::from_pivot("Podium finishes by driver", &summary.podium),
    });

    sections.push(Section::Text {
        text: INCIDENT_INTRO.to_string(),
    });
    sections.push(Section::Chart {
        chart: BarChart::from_pivot("Major incidents by year", &summary.incidents),
    });

    if let Some(rate) = &summary.finish_rate {
        sections.push(Section::Text {
            text: finish_rate_sentence(circuit, rate),
        });
    }

    Report {
        header: Header::default(),
        circuit: circuit.to_string(),
        sections,
    }
}
