//! Memoized dataset loading.
//!
//! `DataLoader` keeps one parsed table per location for the lifetime of the process. Nothing is
//! ever evicted; a restart is the only invalidation. Failed loads are not cached, so the next
//! call retries the fetch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::Result;
use crate::formats::{CircuitReader, FormatReader, RaceResultReader};
use crate::models::{CircuitTable, RaceTable};
use crate::ports::DataSource;

type Cache<T> = RwLock<HashMap<String, Arc<T>>>;

/// Loads and caches the circuit and race datasets
pub struct DataLoader {
    source: Arc<dyn DataSource>,
    circuits: Cache<CircuitTable>,
    races: Cache<RaceTable>,
}

impl fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLoader")
            .field("source", &self.source.name())
            .field("cached", &self.cached_locations())
            .finish()
    }
}

impl DataLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            circuits: RwLock::new(HashMap::new()),
            races: RwLock::new(HashMap::new()),
        }
    }

    /// Load the circuits GeoJSON at `location`, reusing a cached copy when present
    pub async fn load_geospatial(&self, location: &str) -> Result<Arc<CircuitTable>> {
        self.load_cached(&self.circuits, &CircuitReader, location).await
    }

    /// Load the race-summary CSV at `location`, reusing a cached copy when present
    pub async fn load_tabular(&self, location: &str) -> Result<Arc<RaceTable>> {
        self.load_cached(&self.races, &RaceResultReader, location).await
    }

    /// Every location currently held in either cache, sorted
    pub fn cached_locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = read(&self.circuits).keys().cloned().collect();
        locations.extend(read(&self.races).keys().cloned());
        locations.sort();
        locations
    }

    async fn load_cached<R: FormatReader>(
        &self,
        cache: &Cache<R::Output>,
        reader: &R,
        location: &str,
    ) -> Result<Arc<R::Output>> {
        let cached = read(cache).get(location).cloned();
        if let Some(hit) = cached {
            tracing::debug!(location = %location, "Dataset cache hit");
            return Ok(hit);
        }

        tracing::info!(
            location = %location,
            source = self.source.name(),
            format = reader.format_name(),
            "Loading dataset"
        );

        let content = self.source.fetch(location).await.inspect_err(|e| {
            tracing::error!(location = %location, error = %e, "Failed to fetch dataset");
        })?;

        let dataset = reader.parse(location, &content).inspect_err(|e| {
            tracing::error!(location = %location, error = %e, "Failed to parse dataset");
        })?;

        for warning in &dataset.validation.warnings {
            tracing::warn!(location = %location, "{}", warning);
        }

        let table = Arc::new(dataset.data);
        cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.to_string(), Arc::clone(&table));

        Ok(table)
    }
}

fn read<T>(cache: &Cache<T>) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<T>>> {
    cache.read().unwrap_or_else(PoisonError::into_inner)
}
