//! Download Subcommand

use crate::flags::RpcArgs;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use vrank_core::{ParticipationTracker, RecordCache, VrankConfig};

/// The `download` Subcommand
///
/// Fetches the council at `--start` and the headers of `[start, end]`, builds one participation
/// record per block and writes the window to a JSON cache.
///
/// # Usage
///
/// ```sh
/// vrank download --rpc <URL> --start <BLOCK> [--end <BLOCK>] [--out <PATH>] [--force]
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Downloads the participation records of one window into a cache file")]
pub struct DownloadCommand {
    /// Node connection arguments.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// The first block of the window. Must be a multiple of the period.
    #[arg(long)]
    pub start: u64,
    /// The last block of the window, inclusive. Defaults to `start + period`.
    #[arg(long)]
    pub end: Option<u64>,
    /// The cache file to write. Defaults to `<out-dir>/blocks_<network>_<start>.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// The directory of the default cache file.
    #[arg(long, default_value = "downloads")]
    pub out_dir: PathBuf,
    /// The network name used in the default cache file name.
    #[arg(long, default_value = "cypress", env = "VRANK_NETWORK")]
    pub network: String,
    /// Overwrite an existing cache file.
    #[arg(long)]
    pub force: bool,
}

impl DownloadCommand {
    /// Returns the cache this command writes to.
    pub fn cache(&self) -> RecordCache {
        let path = self
            .out
            .clone()
            .unwrap_or_else(|| RecordCache::default_path(&self.out_dir, &self.network, self.start));
        RecordCache::new(path)
    }

    /// Runs the subcommand.
    pub async fn run(self, config: VrankConfig) -> anyhow::Result<()> {
        let end = self.end.unwrap_or_else(|| config.default_end(self.start));
        config.check_window(self.start, end)?;

        let cache = self.cache();
        cache.ensure_writable(self.force)?;

        let source = self.rpc.source();
        let tracker = ParticipationTracker::new(config);
        let window = tracker.download(&source, self.start, end).await?;
        cache.save(&window, self.force)?;

        info!(
            target: "vrank",
            path = %cache.path().display(),
            records = window.len(),
            failed_recoveries = window.diagnostics.failed_recoveries,
            orphans = window.diagnostics.orphans,
            "downloaded participation window"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> DownloadCommand {
        let base = ["download", "--rpc", "http://localhost:8551"];
        DownloadCommand::try_parse_from(base.iter().chain(args)).unwrap()
    }

    #[rstest]
    #[case::default_path(&["--start", "7200"], "downloads/blocks_cypress_7200.json")]
    #[case::network(&["--start", "0", "--network", "baobab"], "downloads/blocks_baobab_0.json")]
    #[case::explicit(&["--start", "0", "--out", "records.json"], "records.json")]
    fn test_cache_path(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(parse(args).cache().path(), std::path::Path::new(expected));
    }

    #[tokio::test]
    async fn test_misaligned_start_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("blocks.json");
        let command = parse(&["--start", "7201", "--out", out.to_str().unwrap()]);
        let err = command.run(VrankConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("not a multiple of the period"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_existing_cache_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("blocks.json");
        std::fs::write(&out, b"{}").unwrap();
        let command = parse(&["--start", "7200", "--out", out.to_str().unwrap()]);
        let err = command.run(VrankConfig::default()).await.unwrap_err();
        assert!(err.to_string().starts_with("refusing to overwrite"));
        assert_eq!(std::fs::read(&out).unwrap(), b"{}");
    }
}
