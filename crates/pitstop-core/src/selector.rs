//! Circuit selection.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{PitstopError, Result};
use crate::models::CircuitTable;

/// Sorted, de-duplicated circuit names from the circuits dataset
pub fn circuit_names(circuits: &CircuitTable) -> Vec<String> {
    circuits
        .iter()
        .map(|c| c.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Outcome of resolving the user's circuit choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "circuit", rename_all = "snake_case")]
pub enum Selection {
    /// A circuit name to drive the map and statistics
    Selected(String),
    /// The circuit list is empty, nothing can be selected
    NoData,
}

impl Selection {
    /// Resolve a requested circuit against the available names
    ///
    /// With no request (or a blank one) the first name is chosen. A requested name that is not
    /// in the list is kept as-is; the map and statistics then come out empty.
    pub fn resolve(names: &[String], requested: Option<&str>) -> Self {
        let Some(first) = names.first() else {
            return Selection::NoData;
        };

        match requested.filter(|r| !r.trim().is_empty()) {
            None => Selection::Selected(first.clone()),
            Some(name) => {
                if !names.iter().any(|n| n == name) {
                    tracing::warn!(circuit = %name, "Requested circuit is not in the circuit list");
                }
                Selection::Selected(name.to_string())
            }
        }
    }

    pub fn circuit(&self) -> Option<&str> {
        match self {
            Selection::Selected(name) => Some(name),
            Selection::NoData => None,
        }
    }

    /// The selected circuit, or `NoCircuits` when nothing could be selected
    pub fn require(&self) -> Result<&str> {
        self.circuit().ok_or(PitstopError::NoCircuits)
    }
}
