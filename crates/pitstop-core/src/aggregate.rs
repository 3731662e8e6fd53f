//! Per-circuit race statistics.
//!
//! Every aggregate is computed independently from the rows of one circuit and may come out empty.
//! Absence of data is never an error here: an unknown circuit, a circuit with no recorded lap
//! times, or one with no starters simply yields `None` or an empty pivot.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{LapTime, RaceResult, RaceTable};
use crate::pivot::PivotTable;

/// Finishing positions that count as a podium
pub const PODIUM_POSITIONS: [u32; 3] = [1, 2, 3];

/// Race outcomes counted as major incidents
///
/// Variants are declared in label order so pivot columns come out alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncidentStatus {
    #[serde(rename = "Accident")]
    Accident,
    #[serde(rename = "Collision")]
    Collision,
    #[serde(rename = "Collision damage")]
    CollisionDamage,
    #[serde(rename = "Damage")]
    Damage,
    #[serde(rename = "Fatal accident")]
    FatalAccident,
    #[serde(rename = "Spun off")]
    SpunOff,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 6] = [
        IncidentStatus::Accident,
        IncidentStatus::Collision,
        IncidentStatus::CollisionDamage,
        IncidentStatus::Damage,
        IncidentStatus::FatalAccident,
        IncidentStatus::SpunOff,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Accident => "Accident",
            IncidentStatus::Collision => "Collision",
            IncidentStatus::CollisionDamage => "Collision damage",
            IncidentStatus::Damage => "Damage",
            IncidentStatus::FatalAccident => "Fatal accident",
            IncidentStatus::SpunOff => "Spun off",
        }
    }

    /// Exact, case-sensitive match against the status text
    pub fn from_status(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == status)
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The quickest recorded lap at a circuit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastestLap {
    pub time: LapTime,
    pub driver: String,
    pub date: NaiveDate,
}

/// Share of starters that were classified as finishers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinishRate {
    pub starters: usize,
    pub finishers: usize,
    /// Percentage rounded to two decimals
    pub percent: f64,
}

/// Everything the dashboard shows for one circuit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitSummary {
    pub circuit: String,
    pub fastest_lap: Option<FastestLap>,
    /// Drivers × finishing position 1/2/3
    pub podium: PivotTable<String, u32>,
    /// Years × incident category
    pub incidents: PivotTable<i32, IncidentStatus>,
    pub finish_rate: Option<FinishRate>,
}

impl CircuitSummary {
    /// True when the circuit matched no race rows at all
    pub fn has_no_results(&self) -> bool {
        self.finish_rate.is_none()
    }
}

/// Compute all aggregates for `circuit`
pub fn summarize(races: &RaceTable, circuit: &str) -> CircuitSummary {
    let rows: Vec<&RaceResult> = races.for_circuit(circuit).collect();

    tracing::debug!(circuit = %circuit, rows = rows.len(), "Aggregating circuit statistics");

    CircuitSummary {
        circuit: circuit.to_string(),
        fastest_lap: fastest_lap(&rows),
        podium: podium_pivot(&rows),
        incidents: incident_pivot(&rows),
        finish_rate: finish_rate(&rows),
    }
}

/// Quickest lap by duration; ties go to the earliest row
pub fn fastest_lap(rows: &[&RaceResult]) -> Option<FastestLap> {
    let mut best: Option<(&LapTime, &RaceResult)> = None;

    for &row in rows {
        let Some(lap) = row.fastest_lap_time.as_ref() else {
            continue;
        };
        match best {
            Some((current, _)) if lap >= current => {}
            _ => best = Some((lap, row)),
        }
    }

    best.map(|(time, row)| FastestLap {
        time: time.clone(),
        driver: row.driver_name.clone(),
        date: row.race_date,
    })
}

/// Podium finishes per driver and position, with all three positions as columns
pub fn podium_pivot(rows: &[&RaceResult]) -> PivotTable<String, u32> {
    PivotTable::count(
        rows.iter()
            .filter(|row| PODIUM_POSITIONS.contains(&row.position_order))
            .map(|row| (row.driver_name.clone(), row.position_order)),
    )
    .with_columns(PODIUM_POSITIONS)
}

/// Major incidents per year and category; only observed categories become columns
pub fn incident_pivot(rows: &[&RaceResult]) -> PivotTable<i32, IncidentStatus> {
    PivotTable::count(
        rows.iter()
            .filter_map(|row| IncidentStatus::from_status(&row.status).map(|s| (row.year, s))),
    )
}

/// Finishers over starters, `None` when nobody started
pub fn finish_rate(rows: &[&RaceResult]) -> Option<FinishRate> {
    let starters = rows.len();
    if starters == 0 {
        return None;
    }

    let finishers = rows.iter().filter(|row| row.finished()).count();
    Some(FinishRate {
        starters,
        finishers,
        percent: round_to_decimals(finishers as f64 / starters as f64 * 100.0, 2),
    })
}

fn round_to_decimals(number: f64, decimals: i32) -> f64 {
    let multiplier = 10.0_f64.powi(decimals);
    (number * multiplier).round() / multiplier
}
