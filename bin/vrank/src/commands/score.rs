//! Score Subcommand

use anyhow::{Context, ensure};
use clap::Parser;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{info, warn};
use vrank_core::{RecordCache, ScoreEngine, ScoreTable, VrankConfig, score::naive};

/// The `score` Subcommand
///
/// Loads a cached window, scores every validator at every slot and prints the per-validator
/// summary.
///
/// # Usage
///
/// ```sh
/// vrank score --cache <PATH> [--out <PATH>] [--verify]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Scores the validators of a cached window")]
pub struct ScoreCommand {
    /// The cache file written by `download`.
    #[arg(long)]
    pub cache: PathBuf,
    /// Write the full score table as JSON.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Cross-check the scores against a full rescan of every slot.
    #[arg(long)]
    pub verify: bool,
}

impl ScoreCommand {
    /// Runs the subcommand.
    pub fn run(self, config: &VrankConfig) -> anyhow::Result<()> {
        let table = self.score(config)?;
        println!("{}", table.summary_table());
        Ok(())
    }

    /// Scores the cached window, verifying and writing the table as requested.
    pub fn score(&self, config: &VrankConfig) -> anyhow::Result<ScoreTable> {
        let window = RecordCache::new(&self.cache).load()?;
        if window.period != config.period {
            warn!(
                target: "vrank",
                cached = window.period,
                configured = config.period,
                "cache was built for a different period, scoring with the cached one"
            );
        }

        let table = ScoreEngine::score_window(&window)?;
        if self.verify {
            let reference = naive::score_window(&window)?;
            ensure!(reference == table, "incremental scores diverge from the full rescan");
            info!(target: "vrank", slots = window.len(), "scores match the full rescan");
        }

        if let Some(out) = &self.out {
            let file = File::create(out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &table)?;
            writer.flush().with_context(|| format!("failed to write {}", out.display()))?;
            info!(target: "vrank", path = %out.display(), "wrote score table");
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use vrank_core::{BlockRecord, Council, Window, WindowDiagnostics};

    fn cached_window(dir: &std::path::Path) -> PathBuf {
        let council = Council::new([Address::repeat_byte(1), Address::repeat_byte(2)]);
        let records = vec![
            BlockRecord::from_votes(0, &council, &[true, true]),
            BlockRecord::from_votes(1, &council, &[true, false]),
            BlockRecord::from_votes(2, &council, &[true, true]),
        ];
        let window = Window {
            start_block: 0,
            end_block: 2,
            period: 4,
            council,
            records,
            diagnostics: WindowDiagnostics::default(),
        };
        let path = dir.join("blocks_test_0.json");
        RecordCache::new(&path).save(&window, false).unwrap();
        path
    }

    #[test]
    fn test_score_verifies_and_writes_table() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("scores.json");
        let command =
            ScoreCommand { cache: cached_window(dir.path()), out: Some(out.clone()), verify: true };

        let table = command.score(&VrankConfig::default()).unwrap();
        let written: ScoreTable =
            serde_json::from_reader(File::open(&out).unwrap()).unwrap();
        assert_eq!(written.block_nums, vec![0, 1, 2]);
        assert_eq!(written.rows.len(), table.rows.len());

        let absent = table.row(&Address::repeat_byte(2)).unwrap();
        assert_eq!(absent.summary.non_votes, 1);
        assert!((absent.summary.final_score - 74.8).abs() < 1e-9);
    }

    #[test]
    fn test_missing_cache_fails() {
        let dir = tempfile::tempdir().unwrap();
        let command =
            ScoreCommand { cache: dir.path().join("missing.json"), out: None, verify: false };
        assert!(command.score(&VrankConfig::default()).is_err());
    }
}
