//! Pitstop Core - Formula One circuit data, aggregation, and dashboard composition
//!
//! This crate loads the circuit GeoJSON and race-result CSV, caches them per URL, and turns a
//! circuit selection into map layers, per-circuit statistics, and a presentation view model.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod formats;
pub mod loader;
pub mod map;
pub mod models;
pub mod pivot;
pub mod ports;
pub mod report;
pub mod selector;
pub mod sources;

pub use error::{PitstopError, Result};
