//! Straight-up win/loss streaks
//!
//! Positive values count consecutive wins, negative values consecutive losses.

use std::collections::HashMap;

use crate::TeamCode;

/// Signed win/loss streak per team
#[derive(Debug, Default)]
pub struct StreakTracker {
    streaks: HashMap<TeamCode, i32>,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current streak (0 for a team with no history)
    pub fn get(&self, team: &TeamCode) -> i32 {
        *self.streaks.get(team).unwrap_or(&0)
    }

    /// Extend or restart both teams' streaks after a game
    pub fn advance(&mut self, winner: &TeamCode, loser: &TeamCode) {
        let w = self.get(winner);
        let l = self.get(loser);

        self.streaks.insert(winner.clone(), if w > 0 { w + 1 } else { 1 });
        self.streaks.insert(loser.clone(), if l < 0 { l - 1 } else { -1 });
    }
}
