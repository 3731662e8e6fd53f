//! Pitstop CLI - Formula One circuit statistics in the terminal

mod cli;
mod commands;
mod errors;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use pitstop_core::PitstopError;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    if let Err(err) = runtime.block_on(commands::execute(cli)) {
        match err.downcast_ref::<PitstopError>() {
            Some(core) if !json => errors::from_core(core).display(),
            _ => OutputWriter::new(json).error(format!("{:#}", err)),
        }
        std::process::exit(1);
    }

    Ok(())
}
