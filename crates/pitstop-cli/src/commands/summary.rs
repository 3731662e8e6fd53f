//! Summary command implementation

use crate::cli::SummaryArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use pitstop_core::dashboard::{Dashboard, DashboardRequest};
use pitstop_core::report::{BarChart, Section};

pub async fn execute(args: SummaryArgs, dashboard: &Dashboard, output: &OutputWriter) -> Result<()> {
    let request = DashboardRequest {
        circuit: args.circuit,
        basemap: None,
    };
    let view = dashboard.render(&request).await?;

    if output.is_json() {
        output.result(&view)?;
        return Ok(());
    }

    output.section(&view.header.title);

    let Some(report) = &view.report else {
        output.warning(view.message.as_deref().unwrap_or_default());
        return Ok(());
    };

    output.kv("Circuit", &report.circuit);
    for section in &report.sections {
        match section {
            Section::Map { map } => {
                let selected = map
                    .layer(pitstop_core::map::SELECTED_LAYER)
                    .map(|l| l.feature_count())
                    .unwrap_or_default();
                output.kv("Map", format!("{} ({} selected features)", map.basemap, selected));
            }
            Section::Text { text } => {
                output.text("");
                output.text(text);
            }
            Section::Chart { chart } => {
                let (header, rows) = chart_grid(chart);
                output.grid(header, rows);
            }
        }
    }

    Ok(())
}

/// Categories as rows, one column per series, plus a row total
fn chart_grid(chart: &BarChart) -> (Vec<String>, Vec<Vec<String>>) {
    let mut header = vec![String::new()];
    header.extend(chart.series.iter().map(|s| s.name.clone()));
    header.push("Total".to_string());

    let rows = chart
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let values: Vec<u64> = chart
                .series
                .iter()
                .map(|s| s.values.get(i).copied().unwrap_or_default())
                .collect();
            let total: u64 = values.iter().sum();

            let mut row = vec![category.clone()];
            row.extend(values.iter().map(u64::to_string));
            row.push(total.to_string());
            row
        })
        .collect();

    (header, rows)
}
