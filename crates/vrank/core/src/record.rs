//! Per-block participation records.

use crate::{Council, ScoreError};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The voters and non-voters of one block, each in council order.
///
/// A well-formed record partitions the council: every member appears exactly once, in exactly
/// one of the two lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// The block number.
    pub block_num: u64,
    /// Council members with a recovered committed seal.
    #[serde(serialize_with = "crate::checksum::seq::serialize")]
    pub voters: Vec<Address>,
    /// Council members without a recovered committed seal.
    #[serde(serialize_with = "crate::checksum::seq::serialize")]
    pub nonvoters: Vec<Address>,
}

impl BlockRecord {
    /// Builds a record from a per-member vote mask in council order.
    pub fn from_votes(block_num: u64, council: &Council, voted: &[bool]) -> Self {
        let (mut voters, mut nonvoters) = (Vec::new(), Vec::new());
        let voted = voted.iter().copied().chain(std::iter::repeat(false));
        for (member, voted) in council.iter().zip(voted) {
            if voted {
                voters.push(*member);
            } else {
                nonvoters.push(*member);
            }
        }
        Self { block_num, voters, nonvoters }
    }

    /// Returns true if `address` is listed as a non-voter.
    pub fn is_absent(&self, address: &Address) -> bool {
        self.nonvoters.contains(address)
    }

    /// Checks the record against `council` and returns the absence mask in council order.
    pub fn absences(&self, council: &Council) -> Result<Vec<bool>, ScoreError> {
        let block = self.block_num;
        let mut seen = vec![false; council.len()];
        let mut absent = vec![false; council.len()];

        let listed = self
            .voters
            .iter()
            .map(|address| (address, false))
            .chain(self.nonvoters.iter().map(|address| (address, true)));
        for (address, is_absent) in listed {
            let index = council
                .position(address)
                .ok_or(ScoreError::UnknownValidator { block, address: *address })?;
            if seen[index] {
                return Err(ScoreError::DuplicateValidator { block, address: *address });
            }
            seen[index] = true;
            absent[index] = is_absent;
        }

        if let Some(index) = seen.iter().position(|seen| !seen) {
            return Err(ScoreError::IncompleteRecord { block, address: council.members()[index] });
        }
        Ok(absent)
    }
}

/// Recoverable anomalies met while building a single [`BlockRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDiagnostics {
    /// Committed seals that failed signature recovery.
    pub failed_recoveries: usize,
    /// Recovered committers outside the council.
    pub orphans: Vec<Address>,
    /// Committed seals recovering to an already counted member.
    pub duplicates: usize,
}

/// Anomaly totals over a whole window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDiagnostics {
    /// Committed seals attributed to a council member.
    pub recovered_seals: usize,
    /// Committed seals that failed signature recovery.
    pub failed_recoveries: usize,
    /// Recovered committers outside the council.
    pub orphans: usize,
    /// Committed seals recovering to an already counted member.
    pub duplicates: usize,
}

impl WindowDiagnostics {
    /// Folds the diagnostics of one record into the totals.
    pub fn absorb(&mut self, record: &BlockRecord, diagnostics: &RecordDiagnostics) {
        self.recovered_seals += record.voters.len();
        self.failed_recoveries += diagnostics.failed_recoveries;
        self.orphans += diagnostics.orphans.len();
        self.duplicates += diagnostics.duplicates;
    }
}
