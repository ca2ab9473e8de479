use anyhow::Context;
use core::time::Duration;
use snowgen::{Error, SnowflakeGenerator, SnowflakeId, TimeSource};
use std::{fmt::Write as _, thread};

use crate::config::OutputFormat;

/// Mints `count` IDs from `generator`, handing each to `sink` in issue order.
///
/// A clock regression is retried up to `max_retries` times per ID, sleeping
/// for the observed gap between attempts. Any other error, or running out of
/// retries, aborts the run.
pub fn mint<G, T>(
    generator: &G,
    count: u64,
    max_retries: u32,
    mut sink: impl FnMut(SnowflakeId) -> anyhow::Result<()>,
) -> anyhow::Result<()>
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    for _ in 0..count {
        let id = next_with_retry(generator, max_retries)?;
        sink(id)?;
    }
    Ok(())
}

fn next_with_retry<G, T>(generator: &G, max_retries: u32) -> anyhow::Result<SnowflakeId>
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut attempts = 0;
    loop {
        match generator.next_id() {
            Ok(id) => return Ok(id),
            Err(Error::ClockRegression { now, last }) if attempts < max_retries => {
                attempts += 1;
                let behind = last - now;
                tracing::warn!(
                    now,
                    last,
                    attempt = attempts,
                    max_retries,
                    "clock moved backwards, retrying in {behind}ms"
                );
                thread::sleep(Duration::from_millis(behind));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to generate id after {attempts} regression retries")
                });
            }
        }
    }
}

/// Formats `id` for output. `epoch` is only used by [`OutputFormat::Fields`].
pub fn render(id: SnowflakeId, format: OutputFormat, epoch: Duration) -> String {
    match format {
        OutputFormat::Decimal => id.to_string(),
        OutputFormat::Padded => id.to_padded_string(),
        OutputFormat::Fields => {
            let mut out = String::with_capacity(96);
            let _ = write!(
                out,
                "{id} timestamp={} unix_ms={} worker_id={} sequence={}",
                id.timestamp(),
                id.unix_millis(epoch),
                id.worker_id(),
                id.sequence()
            );
            out
        }
    }
}
