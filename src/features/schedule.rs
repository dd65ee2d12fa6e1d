//! Rest and travel features
//!
//! Scheduling context for a team, computed from its previous game.

use chrono::NaiveDate;
use std::fmt;

use super::registry::TeamSnapshot;

/// Label used when a team has no previous game
pub const NOT_AVAILABLE: &str = "N/A";

/// Days off between games, bucketed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestBucket {
    NoHistory,
    /// Back-to-back (also same-day and out-of-order dates)
    Zero,
    One,
    Two,
    ThreePlus,
}

impl RestBucket {
    /// Bucket the gap between a previous game and the current one
    pub fn from_snapshot(last: Option<&TeamSnapshot>, current: NaiveDate) -> Self {
        let last = match last {
            Some(l) => l,
            None => return RestBucket::NoHistory,
        };

        let gap = (current - last.date).num_days() - 1;
        match gap {
            g if g < 1 => RestBucket::Zero,
            1 => RestBucket::One,
            2 => RestBucket::Two,
            _ => RestBucket::ThreePlus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RestBucket::NoHistory => NOT_AVAILABLE,
            RestBucket::Zero => "0",
            RestBucket::One => "1",
            RestBucket::Two => "2",
            RestBucket::ThreePlus => "3+",
        }
    }
}

impl fmt::Display for RestBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Home/away pattern across consecutive games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Travel {
    NoHistory,
    /// Home, then home again
    Homestand,
    /// Home, now away
    Leaves,
    /// Away, now home
    Returns,
    /// Away, then away again
    RoadTrip,
}

impl Travel {
    pub fn from_snapshot(last: Option<&TeamSnapshot>, is_home_now: bool) -> Self {
        match last.map(|l| (l.was_home, is_home_now)) {
            None => Travel::NoHistory,
            Some((true, true)) => Travel::Homestand,
            Some((true, false)) => Travel::Leaves,
            Some((false, true)) => Travel::Returns,
            Some((false, false)) => Travel::RoadTrip,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Travel::NoHistory => NOT_AVAILABLE,
            Travel::Homestand => "Homestand",
            Travel::Leaves => "Leaves",
            Travel::Returns => "Returns",
            Travel::RoadTrip => "RoadTrip",
        }
    }
}

impl fmt::Display for Travel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
