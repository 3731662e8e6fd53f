use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lap_time::LapTime;

/// Status id the data provider uses for a classified finish
pub const FINISHED_STATUS_ID: u32 = 1;

/// One driver's result in one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub circuit_name: String,
    pub driver_name: String,
    pub race_date: NaiveDate,
    pub year: i32,
    /// `None` when the source recorded no fastest lap for this entry
    pub fastest_lap_time: Option<LapTime>,
    /// Final classification rank, 1 = winner
    pub position_order: u32,
    pub status_id: u32,
    pub status: String,
    pub grid: Option<u32>,
}

impl RaceResult {
    pub fn finished(&self) -> bool {
        self.status_id == FINISHED_STATUS_ID
    }
}

/// The race-summary dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceTable {
    pub rows: Vec<RaceResult>,
}

impl RaceTable {
    pub fn new(rows: Vec<RaceResult>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one circuit, matched exactly on `circuit_name`
    pub fn for_circuit<'a>(&'a self, circuit: &'a str) -> impl Iterator<Item = &'a RaceResult> + 'a {
        self.rows.iter().filter(move |row| row.circuit_name == circuit)
    }
}
