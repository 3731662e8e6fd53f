//! Circuits command implementation

use crate::output::OutputWriter;
use anyhow::Result;
use pitstop_core::dashboard::Dashboard;
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct CircuitsOutput {
    circuits: Vec<String>,
    count: usize,
}

#[derive(Tabled)]
struct CircuitRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Circuit")]
    name: String,
}

pub async fn execute(dashboard: &Dashboard, output: &OutputWriter) -> Result<()> {
    let circuits = dashboard.circuits().await?;

    if output.is_json() {
        let count = circuits.len();
        output.result(CircuitsOutput { circuits, count })?;
        return Ok(());
    }

    output.section("Circuits");
    let count = circuits.len();
    let rows: Vec<CircuitRow> = circuits
        .into_iter()
        .enumerate()
        .map(|(i, name)| CircuitRow { index: i + 1, name })
        .collect();
    output.table(rows);
    output.success(format!("{} circuits available", count));

    Ok(())
}
