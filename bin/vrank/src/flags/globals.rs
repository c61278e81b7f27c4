//! Global arguments for the CLI.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use vrank_cli::{LogArgs, MetricsArgs};
use vrank_core::VrankConfig;

/// Global arguments for the CLI.
#[derive(Parser, Default, Clone, Debug)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
    /// Path to a TOML configuration file.
    #[arg(long, global = true, env = "VRANK_CONFIG")]
    pub config: Option<PathBuf>,
    /// The observation period in blocks. Overrides the configuration file.
    #[arg(long, global = true, env = "VRANK_PERIOD")]
    pub period: Option<u64>,
    /// The maximum number of header requests in flight. Overrides the configuration file.
    #[arg(long, global = true, env = "VRANK_FETCH_CONCURRENCY")]
    pub fetch_concurrency: Option<usize>,
}

impl GlobalArgs {
    /// Builds the [`VrankConfig`] from the configuration file and flag overrides.
    pub fn vrank_config(&self) -> anyhow::Result<VrankConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => VrankConfig::default(),
        };
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(fetch_concurrency) = self.fetch_concurrency {
            config.fetch_concurrency = fetch_concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}
