//! Error types for the pitstop dashboard

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PitstopError {
    // Data source errors
    #[error("Data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    // Selection errors
    #[error("No circuits available in the circuit dataset")]
    NoCircuits,

    #[error("Invalid lap time '{value}': {reason}")]
    InvalidLapTime { value: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

impl PitstopError {
    /// Shorthand for a failed or unparsable data fetch
    pub fn data_unavailable(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PitstopError>;
