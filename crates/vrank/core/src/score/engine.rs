use super::{ScoreRow, ScoreTable, ValidatorScore, ValidatorSummary};
use crate::{BlockRecord, Council, ScoreError, Window};

/// The per-validator counters the engine maintains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStats {
    /// Votes so far.
    pub votes: u64,
    /// Non-votes so far.
    pub non_votes: u64,
    /// The non-vote run ending at the latest slot.
    pub current_streak: u64,
    /// The longest non-vote run so far.
    pub max_streak: u64,
}

impl RunningStats {
    /// Folds one slot into the counters.
    ///
    /// `contiguous` is false when the slot's block number does not directly follow the previous
    /// slot's, which breaks the current run.
    pub fn observe(&mut self, absent: bool, contiguous: bool) {
        if !absent {
            self.votes += 1;
            self.current_streak = 0;
            return;
        }
        self.non_votes += 1;
        self.current_streak = if contiguous { self.current_streak + 1 } else { 1 };
        self.max_streak = self.max_streak.max(self.current_streak);
    }
}

/// Incrementally scores a stream of block records against a fixed council.
///
/// Each record costs `O(council)`; scores for any slot are available as soon as the slot is
/// applied.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    council: Council,
    period: u64,
    stats: Vec<RunningStats>,
    last_block: Option<u64>,
    slots: u64,
}

impl ScoreEngine {
    /// Creates an engine with no applied slots.
    pub fn new(council: Council, period: u64) -> Result<Self, ScoreError> {
        if period == 0 {
            return Err(ScoreError::ZeroPeriod);
        }
        let stats = vec![RunningStats::default(); council.len()];
        Ok(Self { council, period, stats, last_block: None, slots: 0 })
    }

    /// Returns the council.
    pub const fn council(&self) -> &Council {
        &self.council
    }

    /// Returns the number of applied slots.
    pub const fn slots(&self) -> u64 {
        self.slots
    }

    /// Returns the counters in council order.
    pub fn stats(&self) -> &[RunningStats] {
        &self.stats
    }

    /// Applies the record of the next slot and returns every validator's score at that slot.
    ///
    /// A record that is out of order or does not partition the council leaves the engine
    /// untouched.
    pub fn apply(&mut self, record: &BlockRecord) -> Result<Vec<ValidatorScore>, ScoreError> {
        let contiguous = match self.last_block {
            Some(previous) if record.block_num <= previous => {
                return Err(ScoreError::UnorderedRecords { previous, block: record.block_num });
            }
            Some(previous) => previous + 1 == record.block_num,
            None => false,
        };
        let absences = record.absences(&self.council)?;

        let slot = self.slots;
        for (stats, absent) in self.stats.iter_mut().zip(absences) {
            stats.observe(absent, contiguous);
        }
        self.last_block = Some(record.block_num);
        self.slots += 1;

        Ok(self
            .stats
            .iter()
            .map(|stats| {
                ValidatorScore::compute(slot, self.period, stats.non_votes, stats.max_streak)
            })
            .collect())
    }

    /// Scores every slot of `window`.
    pub fn score_window(window: &Window) -> Result<ScoreTable, ScoreError> {
        let mut engine = Self::new(window.council.clone(), window.period)?;
        let mut rows: Vec<_> = window
            .council
            .iter()
            .map(|validator| ScoreRow::new(*validator, window.records.len()))
            .collect();

        for record in &window.records {
            for (row, score) in rows.iter_mut().zip(engine.apply(record)?) {
                row.scores.push(score.score);
            }
        }
        for (row, stats) in rows.iter_mut().zip(engine.stats()) {
            row.summary = ValidatorSummary {
                votes: stats.votes,
                non_votes: stats.non_votes,
                max_non_vote_streak: stats.max_streak,
                final_score: row.scores.last().copied().unwrap_or(super::BASE_SCORE),
            };
        }

        vrank_macros::set!(gauge, crate::Metrics::SCORED_WINDOW_START, window.start_block as f64);
        Ok(ScoreTable {
            period: window.period,
            block_nums: window.records.iter().map(|record| record.block_num).collect(),
            rows,
        })
    }
}
