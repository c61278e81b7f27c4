//! The `vrank` binary: downloads istanbul participation records and scores validators.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod cli;
pub mod commands;
pub mod flags;
pub(crate) mod version;

use clap::Parser;

fn main() {
    vrank_cli::backtrace::enable();
    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
