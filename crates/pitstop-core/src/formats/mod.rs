//! Format readers for the two dashboard datasets
//!
//! Each dataset format implements the `FormatReader` trait, turning fetched text into a typed
//! table. Readers never perform I/O; the loader hands them content retrieved through a
//! `DataSource`.

use crate::error::Result;

pub mod csv;
pub mod geojson;

pub use self::csv::RaceResultReader;
pub use self::geojson::CircuitReader;

/// Missing-value marker used throughout the race CSV
pub const MISSING_SENTINEL: &str = "\\N";

/// Format reader trait that all format implementations must implement
pub trait FormatReader: Send + Sync {
    /// Typed table produced by this reader
    type Output;

    /// Parse fetched content
    ///
    /// # Arguments
    /// * `location` - URL or path the content came from, used in error messages
    /// * `content` - The full text of the resource
    ///
    /// # Returns
    /// The parsed table together with non-fatal warnings
    fn parse(&self, location: &str, content: &str) -> Result<FormatDataset<Self::Output>>;

    /// Get human-readable format name (e.g., "GeoJSON")
    fn format_name(&self) -> &str;
}

/// Parsed dataset returned by format readers
#[derive(Debug, Clone)]
pub struct FormatDataset<T> {
    /// Format name (e.g., "GeoJSON", "CSV")
    pub format_name: String,

    /// The parsed table
    pub data: T,

    /// Validation outcome for the parsed content
    pub validation: FormatValidation,
}

/// Non-fatal findings from a parse; fatal problems are returned as errors instead
#[derive(Debug, Clone, Default)]
pub struct FormatValidation {
    /// Skipped or degraded records
    pub warnings: Vec<String>,
}

/// Whether a raw field holds the missing-value marker (or nothing at all)
pub fn is_missing(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == MISSING_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sentinel() {
        assert!(is_missing("\\N"));
        assert!(is_missing(" \\N "));
        assert!(is_missing(""));
        assert!(!is_missing("1:27.452"));
    }
}
