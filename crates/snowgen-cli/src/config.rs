use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use snowgen::{MAX_WORKER_ID, SNOWGEN_EPOCH};
use std::time::{SystemTime, UNIX_EPOCH};

/// How each minted ID is written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain decimal, e.g. `1234567890123456`.
    Decimal,
    /// Zero-padded to 20 digits so IDs sort lexicographically.
    Padded,
    /// Decimal followed by the decoded timestamp, worker id and sequence.
    Fields,
}

/// Runtime configuration for the `snowgen` binary.
///
/// All values are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen",
    version,
    about = "Mint Snowflake-style 64-bit IDs"
)]
pub struct CliArgs {
    /// Number of IDs to mint.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", default_value_t = 1)]
    pub count: u64,

    /// Worker id embedded in every ID (`0..=1023`).
    ///
    /// When omitted, one is derived from this host's network hardware
    /// addresses (or picked at random if none can be read).
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(short, long, env = "WORKER_ID")]
    pub worker_id: Option<u32>,

    /// Epoch the timestamp field counts from, in milliseconds since
    /// 1970-01-01 UTC. Must match the epoch of any IDs these are compared to.
    ///
    /// Environment variable: `EPOCH_MILLIS`
    #[arg(long, env = "EPOCH_MILLIS", default_value_t = SNOWGEN_EPOCH.as_millis() as u64)]
    pub epoch_millis: u64,

    /// Output format.
    ///
    /// Environment variable: `FORMAT`
    #[arg(short, long, env = "FORMAT", value_enum, default_value_t = OutputFormat::Decimal)]
    pub format: OutputFormat,

    /// How many times to retry a single ID after the clock moves backwards
    /// before giving up. Each retry sleeps for the observed regression.
    ///
    /// Environment variable: `MAX_REGRESSION_RETRIES`
    #[arg(long, env = "MAX_REGRESSION_RETRIES", default_value_t = 3)]
    pub max_regression_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub count: u64,
    pub worker_id: Option<u32>,
    pub epoch: Duration,
    pub format: OutputFormat,
    pub max_regression_retries: u32,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("COUNT must be greater than 0");
        }

        if let Some(worker_id) = args.worker_id.filter(|&id| id > MAX_WORKER_ID) {
            bail!("WORKER_ID ({worker_id}) exceeds the worker id space (max = {MAX_WORKER_ID})");
        }

        let epoch = Duration::from_millis(args.epoch_millis);
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        if epoch > now {
            bail!(
                "EPOCH_MILLIS ({}) is in the future (now = {})",
                args.epoch_millis,
                now.as_millis()
            );
        }

        Ok(Self {
            count: args.count,
            worker_id: args.worker_id,
            epoch,
            format: args.format,
            max_regression_retries: args.max_regression_retries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(core::iter::once("snowgen").chain(args.iter().copied()))?;
        CliConfig::try_from(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.count, 1);
        assert_eq!(config.worker_id, None);
        assert_eq!(config.epoch, SNOWGEN_EPOCH);
        assert_eq!(config.format, OutputFormat::Decimal);
        assert_eq!(config.max_regression_retries, 3);
    }

    #[test]
    fn test_explicit_values() {
        let config = parse(&[
            "-n",
            "10",
            "--worker-id",
            "1023",
            "--epoch-millis",
            "0",
            "--format",
            "fields",
            "--max-regression-retries",
            "0",
        ])
        .unwrap();

        assert_eq!(config.count, 10);
        assert_eq!(config.worker_id, Some(1023));
        assert_eq!(config.epoch, Duration::ZERO);
        assert_eq!(config.format, OutputFormat::Fields);
        assert_eq!(config.max_regression_retries, 0);
    }

    #[test]
    fn test_rejects_out_of_range_worker_id() {
        let err = parse(&["--worker-id", "1024"]).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID (1024)"));
    }

    #[test]
    fn test_rejects_zero_count() {
        assert!(parse(&["--count", "0"]).is_err());
    }

    #[test]
    fn test_rejects_future_epoch() {
        let err = parse(&["--epoch-millis", &u64::MAX.to_string()]).unwrap_err();
        assert!(err.to_string().contains("in the future"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(parse(&["--format", "hex"]).is_err());
    }
}
