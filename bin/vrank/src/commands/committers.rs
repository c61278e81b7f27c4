//! Committers Subcommand

use crate::flags::RpcArgs;
use alloy_primitives::Address;
use clap::Parser;
use tabled::{Table, Tabled, settings::Style};
use vrank_core::{Council, HeaderSource, ParticipationTracker, VrankConfig};
use vrank_protocol::{HeaderHasher, RecoveryError, SealRecoverer, Secp256k1Recovery};

/// The `committers` Subcommand
///
/// Recovers the signer of every committed seal of one block and reports whether each belongs to
/// the council of the block's window.
///
/// # Usage
///
/// ```sh
/// vrank committers --rpc <URL> --block <BLOCK>
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Prints the committers of a single block")]
pub struct CommittersCommand {
    /// Node connection arguments.
    #[command(flatten)]
    pub rpc: RpcArgs,
    /// The block to inspect.
    #[arg(long)]
    pub block: u64,
}

/// One committed seal.
#[derive(Debug, Clone, Tabled)]
pub struct CommitterRow {
    /// The seal index within the extra-data field.
    #[tabled(rename = "Seal")]
    pub seal: usize,
    /// The recovered committer, or the recovery failure.
    #[tabled(rename = "Committer")]
    pub committer: String,
    /// Whether the committer is a council member.
    #[tabled(rename = "Council")]
    pub member: String,
}

impl CommitterRow {
    fn new(seal: usize, committer: Result<Address, RecoveryError>, council: &Council) -> Self {
        match committer {
            Ok(address) => {
                let member = council.position(&address).map_or_else(
                    || "orphan".to_string(),
                    |position| format!("member #{position}"),
                );
                Self { seal, committer: address.to_string(), member }
            }
            Err(err) => Self { seal, committer: format!("<{err}>"), member: "-".to_string() },
        }
    }
}

impl CommittersCommand {
    /// Runs the subcommand.
    pub async fn run(self, config: VrankConfig) -> anyhow::Result<()> {
        let source = self.rpc.source();
        let window_start = self.block - self.block % config.period;
        let tracker = ParticipationTracker::new(config);
        let council = tracker.fetch_council(&source, window_start).await?;
        let header = source.header_by_number(self.block).await?;

        let extra = header.extra()?;
        let recomputed = HeaderHasher::hash(&header, true)?;
        let rows: Vec<_> = SealRecoverer::<Secp256k1Recovery>::default()
            .committers(header.hash, &extra)
            .into_iter()
            .enumerate()
            .map(|(seal, committer)| CommitterRow::new(seal, committer, &council))
            .collect();
        let (record, _) = tracker.build_record(&header, &council)?;

        println!("block:     {}", header.number);
        println!("hash:      {}", header.hash);
        println!(
            "rehash:    {} ({})",
            recomputed,
            if recomputed == header.hash { "matches" } else { "MISMATCH" }
        );
        println!("council:   {} members at block {window_start}", council.len());
        println!("voters:    {}", record.voters.len());
        println!("absent:    {:?}", record.nonvoters);

        let mut table = Table::new(rows);
        table.with(Style::modern());
        println!("{table}");
        Ok(())
    }
}
