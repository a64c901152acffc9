#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, CliConfig};
use cli::output::run;
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    init_telemetry()?;
    let config = CliConfig::try_from(args)?;
    tracing::debug!(?config, "starting");

    run(&config, &mut std::io::stdout().lock())
}
