//! Previous-game outcomes
//!
//! What happened in a team's last game: cover, straight-up result, total.

use std::fmt;

use super::registry::TeamSnapshot;
use super::schedule::NOT_AVAILABLE;
use crate::{Hit, OverUnder};

/// A previous-game label, or no history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Previous<T> {
    NoHistory,
    Known(T),
}

impl<T> Previous<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Previous::NoHistory => None,
            Previous::Known(v) => Some(v),
        }
    }
}

impl Previous<Hit> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Previous::NoHistory => NOT_AVAILABLE,
            Previous::Known(hit) => hit.as_str(),
        }
    }
}

impl Previous<OverUnder> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Previous::NoHistory => NOT_AVAILABLE,
            Previous::Known(ou) => ou.as_str(),
        }
    }
}

impl fmt::Display for Previous<Hit> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Previous<OverUnder> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Did the team cover its last game
pub fn prev_ats(last: Option<&TeamSnapshot>) -> Previous<Hit> {
    match last {
        Some(l) => Previous::Known(Hit::from_bool(l.covered)),
        None => Previous::NoHistory,
    }
}

/// Did the team win its last game straight up
pub fn prev_ml(last: Option<&TeamSnapshot>) -> Previous<Hit> {
    match last {
        Some(l) => Previous::Known(Hit::from_bool(l.won)),
        None => Previous::NoHistory,
    }
}

/// Total outcome of the team's last game
pub fn prev_ou(last: Option<&TeamSnapshot>) -> Previous<OverUnder> {
    match last {
        Some(l) => Previous::Known(l.ou),
        None => Previous::NoHistory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_no_history() {
        assert_eq!(prev_ats(None).as_str(), "N/A");
        assert_eq!(prev_ml(None).as_str(), "N/A");
        assert_eq!(prev_ou(None).as_str(), "N/A");
    }

    #[test]
    fn test_cover_without_win() {
        // Lost straight up but covered as an underdog
        let last = TeamSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            covered: true,
            won: false,
            ou: OverUnder::Over,
            was_home: false,
        };

        assert_eq!(prev_ats(Some(&last)).as_str(), "SI");
        assert_eq!(prev_ml(Some(&last)).as_str(), "NO");
        assert_eq!(prev_ou(Some(&last)).as_str(), "Over");
        assert_eq!(prev_ats(Some(&last)).known(), Some(&Hit::Si));
    }
}
