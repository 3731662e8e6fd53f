//! CSV race-result reader
//!
//! Converts the race-summary CSV into typed rows. Missing-value markers (`\N`) are turned into
//! `None` here so nothing downstream ever sees the sentinel.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{PitstopError, Result};
use crate::formats::{is_missing, FormatDataset, FormatReader, FormatValidation};
use crate::models::{LapTime, RaceResult, RaceTable};

/// Columns the reader needs; any other columns are ignored
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "circuit_name",
    "driver_name",
    "race_date",
    "year",
    "fastestLapTime",
    "positionOrder",
    "statusId",
    "status",
    "grid",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Reads the race-summary CSV
pub struct RaceResultReader;

/// Row layout as it appears in the file
#[derive(Debug, Deserialize)]
struct RawRaceRecord {
    circuit_name: String,
    driver_name: String,
    race_date: String,
    year: i32,
    #[serde(rename = "fastestLapTime")]
    fastest_lap_time: String,
    #[serde(rename = "positionOrder")]
    position_order: u32,
    #[serde(rename = "statusId")]
    status_id: u32,
    status: String,
    grid: String,
}

impl FormatReader for RaceResultReader {
    type Output = RaceTable;

    fn parse(&self, location: &str, content: &str) -> Result<FormatDataset<RaceTable>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(|e| {
            PitstopError::data_unavailable(location, format!("Failed to read CSV header: {}", e))
        })?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(PitstopError::data_unavailable(
                location,
                format!("CSV is missing required columns: {}", missing.join(", ")),
            ));
        }

        let mut validation = FormatValidation::default();
        let mut rows = Vec::new();

        for (idx, record) in reader.deserialize::<RawRaceRecord>().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let raw = record.map_err(|e| {
                PitstopError::data_unavailable(location, format!("Invalid CSV row at line {}: {}", line, e))
            })?;
            rows.push(self.convert_record(raw, line, location, &mut validation)?);
        }

        Ok(FormatDataset {
            format_name: self.format_name().to_string(),
            data: RaceTable::new(rows),
            validation,
        })
    }

    fn format_name(&self) -> &str {
        "CSV"
    }
}

impl RaceResultReader {
    fn convert_record(
        &self,
        raw: RawRaceRecord,
        line: usize,
        location: &str,
        validation: &mut FormatValidation,
    ) -> Result<RaceResult> {
        let race_date = parse_date(&raw.race_date).ok_or_else(|| {
            PitstopError::data_unavailable(
                location,
                format!("Invalid race_date '{}' at line {}", raw.race_date, line),
            )
        })?;

        let fastest_lap_time = if is_missing(&raw.fastest_lap_time) {
            None
        } else {
            match raw.fastest_lap_time.parse::<LapTime>() {
                Ok(lap) => Some(lap),
                Err(e) => {
                    validation.warnings.push(format!("Line {}: {}; treated as missing", line, e));
                    None
                }
            }
        };

        let grid = if is_missing(&raw.grid) {
            None
        } else {
            match raw.grid.parse::<u32>() {
                Ok(grid) => Some(grid),
                Err(_) => {
                    validation
                        .warnings
                        .push(format!("Line {}: invalid grid '{}'; treated as missing", line, raw.grid));
                    None
                }
            }
        };

        Ok(RaceResult {
            circuit_name: raw.circuit_name,
            driver_name: raw.driver_name,
            race_date,
            year: raw.year,
            fastest_lap_time,
            position_order: raw.position_order,
            status_id: raw.status_id,
            status: raw.status,
            grid,
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "resultId,circuit_name,driver_name,race_date,year,grid,positionOrder,fastestLapTime,statusId,status";

    fn csv_with(rows: &[&str]) -> String {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content
    }

    #[test]
    fn test_reads_rows_and_ignores_extra_columns() {
        let content = csv_with(&[
            "1,Circuit de Monaco,Ayrton Senna,1988-05-15,1988,1,11,1:26.321,5,Accident",
            "2,Circuit de Monaco,Alain Prost,1988-05-15,1988,2,1,1:26.714,1,Finished",
        ]);

        let dataset = RaceResultReader.parse("f1_summary.csv", &content).unwrap();
        let rows = &dataset.data.rows;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].driver_name, "Ayrton Senna");
        assert_eq!(rows[0].race_date, NaiveDate::from_ymd_opt(1988, 5, 15).unwrap());
        assert_eq!(rows[0].position_order, 11);
        assert_eq!(rows[0].grid, Some(1));
        assert!(!rows[0].finished());
        assert!(rows[1].finished());
        assert_eq!(rows[1].fastest_lap_time.as_ref().unwrap().as_millis(), 86_714);
    }

    #[test]
    fn test_sentinel_becomes_none() {
        let content = csv_with(&["1,Monza Circuit,Alberto Ascari,1952-09-07,1952,\\N,1,\\N,1,Finished"]);

        let dataset = RaceResultReader.parse("f1_summary.csv", &content).unwrap();
        let row = &dataset.data.rows[0];

        assert!(row.fastest_lap_time.is_none());
        assert!(row.grid.is_none());
        assert!(dataset.validation.warnings.is_empty());
    }

    #[test]
    fn test_unparsable_lap_time_is_warning() {
        let content = csv_with(&["1,Monza Circuit,Juan Fangio,1953-09-13,1953,2,2,fast,1,Finished"]);

        let dataset = RaceResultReader.parse("f1_summary.csv", &content).unwrap();
        assert!(dataset.data.rows[0].fastest_lap_time.is_none());
        assert_eq!(dataset.validation.warnings.len(), 1);
    }

    #[test]
    fn test_oversized_lap_time_is_warning() {
        let content = csv_with(&[
            "1,Monza Circuit,Juan Fangio,1953-09-13,1953,2,2,999999999999999999:00.000,1,Finished",
        ]);

        let dataset = RaceResultReader.parse("f1_summary.csv", &content).unwrap();
        assert!(dataset.data.rows[0].fastest_lap_time.is_none());
        assert_eq!(dataset.validation.warnings.len(), 1);
        assert!(dataset.validation.warnings[0].contains("out of range"));
    }

    #[test]
    fn test_missing_column_is_data_unavailable() {
        let content = "circuit_name,driver_name\nMonza Circuit,Juan Fangio";

        let err = RaceResultReader.parse("f1_summary.csv", content).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("race_date"));
        assert!(message.contains("fastestLapTime"));
    }

    #[test]
    fn test_bad_integer_is_data_unavailable() {
        let content = csv_with(&["1,Monza Circuit,Juan Fangio,1953-09-13,nineteen,2,2,\\N,1,Finished"]);

        let err = RaceResultReader.parse("f1_summary.csv", &content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_date_is_data_unavailable() {
        let content = csv_with(&["1,Monza Circuit,Juan Fangio,someday,1953,2,2,\\N,1,Finished"]);
        assert!(RaceResultReader.parse("f1_summary.csv", &content).is_err());
    }

    #[test]
    fn test_alternate_date_format() {
        assert_eq!(parse_date("07/09/1952"), NaiveDate::from_ymd_opt(1952, 9, 7));
        assert_eq!(parse_date("1952-09-07"), NaiveDate::from_ymd_opt(1952, 9, 7));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let dataset = RaceResultReader.parse("f1_summary.csv", HEADER).unwrap();
        assert!(dataset.data.is_empty());
    }
}
