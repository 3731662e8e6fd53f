use clap::{Parser, Subcommand};
use pitstop_core::map::Basemap;
use std::path::PathBuf;

/// Pitstop - Formula One circuit maps and race statistics
#[derive(Parser, Debug)]
#[command(name = "pitstop")]
#[command(about = "Formula One circuit maps and race statistics, 1950 to 2023", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML config file (overrides PITSTOP_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL or directory holding the circuit and race datasets
    #[arg(long, global = true, value_name = "URL")]
    pub data_url: Option<String>,

    /// HTTP timeout in seconds for dataset downloads
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available circuits
    Circuits,

    /// Show fastest lap, podium finishers, major incidents and finish rate for a circuit
    Summary(SummaryArgs),

    /// Print the map description (basemap, layers, viewport) for a circuit
    Map(MapArgs),

    /// Show resolved configuration values and where they came from
    Config,
}

#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Circuit name (defaults to the first circuit alphabetically)
    pub circuit: Option<String>,
}

#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Circuit name (defaults to the first circuit alphabetically)
    pub circuit: Option<String>,

    /// Basemap: OpenStreetMap, Stamen Terrain, or Stamen Toner
    #[arg(long, value_parser = parse_basemap)]
    pub basemap: Option<Basemap>,
}

fn parse_basemap(raw: &str) -> Result<Basemap, String> {
    raw.parse::<Basemap>().map_err(|e| e.to_string())
}
