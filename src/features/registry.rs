//! Team state registry
//!
//! Holds each team's most recently processed game.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{OverUnder, TeamCode};

/// A team's state as of its most recent processed game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamSnapshot {
    pub date: NaiveDate,
    /// Covered the spread
    pub covered: bool,
    /// Won straight up
    pub won: bool,
    pub ou: OverUnder,
    pub was_home: bool,
}

/// Last-game snapshot per team
#[derive(Debug, Default)]
pub struct TeamStateRegistry {
    snapshots: HashMap<TeamCode, TeamSnapshot>,
}

impl TeamStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot before the game being processed, if the team has played
    pub fn get(&self, team: &TeamCode) -> Option<TeamSnapshot> {
        self.snapshots.get(team).copied()
    }

    /// Overwrite a team's snapshot
    pub fn put(&mut self, team: TeamCode, snapshot: TeamSnapshot) {
        self.snapshots.insert(team, snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn teams(&self) -> impl Iterator<Item = (&TeamCode, &TeamSnapshot)> {
        self.snapshots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(day: u32, was_home: bool) -> TeamSnapshot {
        TeamSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            covered: true,
            won: false,
            ou: OverUnder::Over,
            was_home,
        }
    }

    #[test]
    fn test_unknown_team() {
        let registry = TeamStateRegistry::new();
        assert!(registry.get(&TeamCode::new("BOS")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let mut registry = TeamStateRegistry::new();
        let bos = TeamCode::new("BOS");

        registry.put(bos.clone(), snapshot(1, true));
        registry.put(bos.clone(), snapshot(3, false));

        let snap = registry.get(&bos).unwrap();
        assert_eq!(snap.date.format("%d").to_string(), "03");
        assert!(!snap.was_home);
        assert_eq!(registry.len(), 1);
    }
}
