//! Contains the vrank CLI.

use crate::{
    commands::{CommittersCommand, DownloadCommand, ScoreCommand},
    flags::GlobalArgs,
    version,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use vrank_cli::cli_styles;
use vrank_core::Metrics;

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Downloads the participation records of one window into a cache file.
    #[command(alias = "d")]
    Download(DownloadCommand),
    /// Scores the validators of a cached window.
    #[command(alias = "s")]
    Score(ScoreCommand),
    /// Prints the committers of a single block.
    #[command(alias = "c")]
    Committers(CommittersCommand),
}

/// The vrank CLI.
#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version = version::SHORT_VERSION,
    long_version = version::LONG_VERSION,
    about,
    styles = cli_styles(),
    long_about = None
)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.init_stack()?;
        let config = self.global.vrank_config()?;

        match self.subcommand {
            Commands::Score(score) => score.run(&config),
            Commands::Download(download) => Self::block_on(download.run(config)),
            Commands::Committers(committers) => Self::block_on(committers.run(config)),
        }
    }

    /// Initializes the tracing subscriber and, if enabled, the Prometheus exporter.
    fn init_stack(&self) -> Result<()> {
        self.global.log_args.init_tracing()?;
        if let Some(addr) = self.global.metrics.init_metrics()? {
            Metrics::init();
            tracing::debug!(target: "vrank", %addr, "metrics exporter started");
        }
        Ok(())
    }

    /// Runs a future to completion on a fresh multi-threaded runtime.
    fn block_on<F>(fut: F) -> Result<()>
    where
        F: std::future::Future<Output = Result<()>>,
    {
        let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        rt.block_on(fut)
    }
}
