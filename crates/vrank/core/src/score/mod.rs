//! Decaying validator scores over a window of block records.

mod engine;
pub use engine::{RunningStats, ScoreEngine};

pub mod naive;

mod table;
pub use table::{ScoreRow, ScoreTable, SummaryRow, ValidatorSummary};

use serde::{Deserialize, Serialize};

/// The score every validator starts a window with.
pub const BASE_SCORE: f64 = 50.0;

/// The score gained by voting through a whole period.
pub const VOTE_ADD_WEIGHT: f64 = 50.0;

/// The penalty weight of each missed vote.
pub const NON_VOTE_PENALTY: f64 = 0.2;

/// The score of one validator at one slot, with the quantities it is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorScore {
    /// Non-votes over slots `0..=slot`.
    pub non_vote_count: u64,
    /// The longest run of non-votes over consecutive block numbers.
    pub max_non_vote_streak: u64,
    /// `50 * slot / period`.
    pub vote_add: f64,
    /// `non_vote_count * 0.2 + floor(max_non_vote_streak * 2 * 0.2)`.
    pub vote_deduct: f64,
    /// `50 + vote_add - vote_deduct`, unclamped.
    pub score: f64,
}

impl ValidatorScore {
    /// Computes the score at `slot` from the running quantities.
    ///
    /// Both the incremental engine and the [`naive`] reference go through here, so equal inputs
    /// produce bit-identical scores.
    pub fn compute(slot: u64, period: u64, non_vote_count: u64, max_non_vote_streak: u64) -> Self {
        let vote_add = VOTE_ADD_WEIGHT * slot as f64 / period as f64;
        let vote_deduct = non_vote_count as f64 * NON_VOTE_PENALTY
            + (max_non_vote_streak as f64 * 2.0 * NON_VOTE_PENALTY).floor();
        Self {
            non_vote_count,
            max_non_vote_streak,
            vote_add,
            vote_deduct,
            score: BASE_SCORE + vote_add - vote_deduct,
        }
    }
}
