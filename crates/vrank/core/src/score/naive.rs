//! Reference scoring that rescans every record prefix.
//!
//! Quadratic in the window length. Used to cross-check [`super::ScoreEngine`].

use super::{ScoreRow, ScoreTable, ValidatorScore, ValidatorSummary};
use crate::{BlockRecord, ScoreError, Window};
use alloy_primitives::Address;

/// Scores `validator` at `slot` by rescanning `records[..=slot]`.
///
/// # Panics
///
/// Panics if `slot` is out of bounds.
pub fn score_at(
    records: &[BlockRecord],
    period: u64,
    validator: &Address,
    slot: usize,
) -> ValidatorScore {
    let mut non_votes = 0;
    let mut run = 0;
    let mut max_run = 0;
    for (i, record) in records[..=slot].iter().enumerate() {
        if !record.is_absent(validator) {
            run = 0;
            continue;
        }
        non_votes += 1;
        let contiguous = i > 0 && records[i - 1].block_num + 1 == record.block_num;
        run = if contiguous { run + 1 } else { 1 };
        max_run = u64::max(max_run, run);
    }
    ValidatorScore::compute(slot as u64, period, non_votes, max_run)
}

/// Scores every slot of `window` by full rescans.
pub fn score_window(window: &Window) -> Result<ScoreTable, ScoreError> {
    window.validate()?;

    let slots = window.records.len();
    let rows = window
        .council
        .iter()
        .map(|validator| {
            let mut row = ScoreRow::new(*validator, slots);
            let mut last = None;
            for slot in 0..slots {
                let score = score_at(&window.records, window.period, validator, slot);
                row.scores.push(score.score);
                last = Some(score);
            }
            row.summary = last.map_or_else(ValidatorSummary::default, |last| ValidatorSummary {
                votes: slots as u64 - last.non_vote_count,
                non_votes: last.non_vote_count,
                max_non_vote_streak: last.max_non_vote_streak,
                final_score: last.score,
            });
            row
        })
        .collect();

    Ok(ScoreTable {
        period: window.period,
        block_nums: window.records.iter().map(|record| record.block_num).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Council, score::BASE_SCORE};

    #[test]
    fn test_score_at_rescans_prefix() {
        let council = Council::new([Address::repeat_byte(1), Address::repeat_byte(2)]);
        let records: Vec<_> = [(7, [true, false]), (8, [false, false]), (9, [true, false])]
            .into_iter()
            .map(|(block, voted)| BlockRecord::from_votes(block, &council, &voted))
            .collect();

        let second = Address::repeat_byte(2);
        assert_eq!(score_at(&records, 4, &second, 0).non_vote_count, 1);
        assert_eq!(score_at(&records, 4, &second, 2).non_vote_count, 3);
        assert_eq!(score_at(&records, 4, &second, 2).max_non_vote_streak, 3);
        assert_eq!(score_at(&records, 4, &Address::repeat_byte(1), 2).non_vote_count, 1);
    }

    #[test]
    fn test_empty_summary_starts_at_base_score() {
        assert_eq!(ValidatorSummary::default().final_score, BASE_SCORE);
    }
}
