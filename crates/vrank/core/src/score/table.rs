use super::BASE_SCORE;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Style, object::Columns},
};

/// Window totals for one validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSummary {
    /// Slots with a vote.
    pub votes: u64,
    /// Slots without a vote.
    pub non_votes: u64,
    /// The longest non-vote run over consecutive block numbers.
    pub max_non_vote_streak: u64,
    /// The score at the last slot.
    pub final_score: f64,
}

impl Default for ValidatorSummary {
    fn default() -> Self {
        Self { votes: 0, non_votes: 0, max_non_vote_streak: 0, final_score: BASE_SCORE }
    }
}

/// One validator's scores, one cell per slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRow {
    /// The validator address.
    #[serde(serialize_with = "crate::checksum::serialize")]
    pub validator: Address,
    /// The score at each slot.
    pub scores: Vec<f64>,
    /// Window totals.
    pub summary: ValidatorSummary,
}

impl ScoreRow {
    pub(crate) fn new(validator: Address, slots: usize) -> Self {
        Self { validator, scores: Vec::with_capacity(slots), summary: ValidatorSummary::default() }
    }
}

/// Scores of every validator at every slot of a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTable {
    /// The period the scores were computed for.
    pub period: u64,
    /// The block number of each slot.
    pub block_nums: Vec<u64>,
    /// One row per validator, in council order.
    pub rows: Vec<ScoreRow>,
}

/// A rendered summary line.
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    /// The validator address.
    #[tabled(rename = "Validator")]
    pub validator: Address,
    /// Slots with a vote.
    #[tabled(rename = "Votes")]
    pub votes: u64,
    /// Slots without a vote.
    #[tabled(rename = "Non-votes")]
    pub non_votes: u64,
    /// The longest non-vote run.
    #[tabled(rename = "Max streak")]
    pub max_streak: u64,
    /// The final score, rounded for display.
    #[tabled(rename = "Final score")]
    pub final_score: String,
}

impl ScoreTable {
    /// Returns the score of `validator` at `slot`.
    pub fn score(&self, validator: &Address, slot: usize) -> Option<f64> {
        self.row(validator)?.scores.get(slot).copied()
    }

    /// Returns the row of `validator`.
    pub fn row(&self, validator: &Address) -> Option<&ScoreRow> {
        self.rows.iter().find(|row| row.validator == *validator)
    }

    /// Returns the summary lines, lowest final score first.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.summary.final_score.total_cmp(&b.summary.final_score));
        rows.into_iter()
            .map(|row| SummaryRow {
                validator: row.validator,
                votes: row.summary.votes,
                non_votes: row.summary.non_votes,
                max_streak: row.summary.max_non_vote_streak,
                final_score: format!("{:.2}", row.summary.final_score),
            })
            .collect()
    }

    /// Renders the summary as a text table.
    pub fn summary_table(&self) -> Table {
        let mut table = Table::new(self.summary_rows());
        table.with(Style::modern());
        for column in 1..=4 {
            table.modify(Columns::one(column), Alignment::right());
        }
        table
    }
}
