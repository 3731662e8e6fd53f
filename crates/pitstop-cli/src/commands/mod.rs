//! Command implementations

mod circuits;
mod config;
mod map;
mod summary;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;
use pitstop_core::config::{CliConfigOverrides, LayeredConfig};
use pitstop_core::dashboard::Dashboard;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let resolved = resolve_config(&cli)?;

    match cli.command {
        Commands::Circuits => circuits::execute(&dashboard(&resolved)?, &output).await,
        Commands::Summary(args) => summary::execute(args, &dashboard(&resolved)?, &output).await,
        Commands::Map(args) => map::execute(args, &dashboard(&resolved)?, &output).await,
        Commands::Config => config::execute(&resolved, &output),
    }
}

/// Defaults, config file, environment, then command-line flags
fn resolve_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::load(cli.config.as_deref())?;
    config.update_from_cli(CliConfigOverrides {
        data_url: cli.data_url.clone(),
        basemap: None,
        http_timeout_secs: cli.timeout,
    });
    config.validate()?;
    Ok(config)
}

fn dashboard(config: &LayeredConfig) -> Result<Dashboard> {
    tracing::debug!(geojson = %config.geojson_url(), csv = %config.csv_url(), "Dataset locations");
    Ok(Dashboard::from_config(config)?)
}
