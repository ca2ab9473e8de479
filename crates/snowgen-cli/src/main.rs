#![doc = include_str!("../README.md")]

mod config;
mod mint;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, CliConfig};
use snowgen::{HardwareWorkerId, LockSnowflakeGenerator, SystemClock};
use std::io::{BufWriter, Write};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;

    let clock = SystemClock::with_epoch(config.epoch);
    let generator = match config.worker_id {
        Some(worker_id) => LockSnowflakeGenerator::new(worker_id, clock),
        None => LockSnowflakeGenerator::from_provider(&HardwareWorkerId, clock),
    }
    .context("failed to construct generator")?;

    log_startup_info(&config, generator.worker_id());

    let mut out = BufWriter::new(std::io::stdout().lock());
    mint::mint(
        &generator,
        config.count,
        config.max_regression_retries,
        |id| {
            writeln!(out, "{}", mint::render(id, config.format, config.epoch))?;
            Ok(())
        },
    )?;
    out.flush()?;

    tracing::debug!(count = config.count, "done");
    Ok(())
}

fn log_startup_info(config: &CliConfig, worker_id: u32) {
    if cfg!(debug_assertions) {
        tracing::debug!("Minting with worker id {} and full config: {:#?}", worker_id, config);
    } else {
        tracing::debug!(
            "Minting {} ids with worker id {} (explicit: {})",
            config.count,
            worker_id,
            config.worker_id.is_some()
        );
    }
}
