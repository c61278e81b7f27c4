//! Logging arguments and tracing subscriber setup.

use crate::CliResult;
use clap::{ArgAction, Args};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging arguments shared by every subcommand.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level. `-v` enables debug logs, `-vv` trace logs.
    #[arg(short = 'v', long = "verbosity", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
    /// Emit logs as JSON lines.
    #[arg(long = "log.json", global = true, env = "VRANK_LOG_JSON")]
    pub json: bool,
}

impl LogArgs {
    /// Returns the level enabled by the verbosity flag.
    pub const fn level(&self) -> LevelFilter {
        verbosity_level(self.verbosity)
    }

    /// Installs the global tracing subscriber for these arguments.
    pub fn init_tracing(&self) -> CliResult<()> {
        init_tracing_subscriber(self.verbosity, self.json, None)
    }
}

const fn verbosity_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// Without an explicit `filter`, `RUST_LOG` directives apply on top of the level selected by
/// `verbosity`.
pub fn init_tracing_subscriber(
    verbosity: u8,
    json: bool,
    filter: Option<EnvFilter>,
) -> CliResult<()> {
    let filter = filter.unwrap_or_else(|| {
        EnvFilter::builder()
            .with_default_directive(verbosity_level(verbosity).into())
            .from_env_lossy()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}
