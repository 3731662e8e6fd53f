pub mod circuit;
pub mod geometry;
pub mod lap_time;
pub mod race;

pub use circuit::{Circuit, CircuitTable};
pub use geometry::{Bounds, Geometry};
pub use lap_time::LapTime;
pub use race::{RaceResult, RaceTable};
