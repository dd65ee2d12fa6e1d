//! Absolute game results
//!
//! Translates pick-relative hits into home/away cover and win flags.

use crate::GameRecord;

/// Cover and straight-up result for both sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub home_covered: bool,
    pub away_covered: bool,
    pub home_won: bool,
    pub away_won: bool,
}

impl GameResult {
    /// Resolve from the pick's ATS and ML hits
    pub fn resolve(is_pick_home: bool, ats_hit: bool, ml_hit: bool) -> Self {
        let home_covered = if is_pick_home { ats_hit } else { !ats_hit };
        // Pick won straight up <=> pick side won
        let home_won = if is_pick_home { ml_hit } else { !ml_hit };

        GameResult {
            home_covered,
            away_covered: !home_covered,
            home_won,
            away_won: !home_won,
        }
    }

    pub fn from_record(record: &GameRecord) -> Self {
        Self::resolve(
            record.is_pick_home(),
            record.ats_result.is_hit(),
            record.ml_result.is_hit(),
        )
    }
}
