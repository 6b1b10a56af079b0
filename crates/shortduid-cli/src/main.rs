#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::commands::run;
use cli::config::{CliArgs, Config};
use cli::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(
        shard_id = config.shard_id,
        epoch_start = config.epoch_start,
        min_length = config.min_length,
        "configuration loaded"
    );

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}
