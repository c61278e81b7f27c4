//! The owned context of one observation window.

use crate::{BlockRecord, Council, ScoreError, VrankConfig, WindowDiagnostics};
use serde::{Deserialize, Serialize};

/// The council and ordered block records of one observation window.
///
/// Written once by the [`crate::ParticipationTracker`] and read-only afterwards. The serialized
/// form is the record cache document; diagnostics are not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// The first block of the window.
    pub start_block: u64,
    /// The last block of the window, inclusive.
    pub end_block: u64,
    /// The observation period the window was built for.
    pub period: u64,
    /// The committee, fetched at the first block.
    pub council: Council,
    /// One record per block, indexed by slot.
    pub records: Vec<BlockRecord>,
    /// Anomaly totals met while building the records.
    #[serde(skip)]
    pub diagnostics: WindowDiagnostics,
}

impl Window {
    /// Returns the number of slots in the window.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the window holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `slot`.
    pub fn record(&self, slot: usize) -> Option<&BlockRecord> {
        self.records.get(slot)
    }

    /// Checks that the bounds form an observation window and hold every record.
    ///
    /// The window must start on a period boundary and span at most `period + 1` blocks.
    pub fn check_bounds(&self) -> Result<(), ScoreError> {
        let (start, end) = (self.start_block, self.end_block);
        VrankConfig { period: self.period, ..Default::default() }.check_window(start, end)?;
        if let Some(record) =
            self.records.iter().find(|record| !(start..=end).contains(&record.block_num))
        {
            return Err(ScoreError::OutOfWindow { block: record.block_num, start, end });
        }
        Ok(())
    }

    /// Checks that records strictly increase and partition the council.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.period == 0 {
            return Err(ScoreError::ZeroPeriod);
        }
        let mut previous: Option<u64> = None;
        for record in &self.records {
            if let Some(previous) = previous.filter(|previous| record.block_num <= *previous) {
                return Err(ScoreError::UnorderedRecords { previous, block: record.block_num });
            }
            record.absences(&self.council)?;
            previous = Some(record.block_num);
        }
        Ok(())
    }
}
