//! Row selection over derived games
//!
//! Filters are plain equality/threshold checks on the derived table; the
//! perspective decides whose results count as a "win".

use std::str::FromStr;

use crate::features::{DerivedRow, SideContext};
use crate::{ColumnConfig, OverUnder, TeamCode};

/// Whose results a selection is scored from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Perspective {
    /// The model's pick
    #[default]
    Model,
    /// A target team, whichever side it played
    Team,
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" => Ok(Perspective::Model),
            "team" => Ok(Perspective::Team),
            _ => Err(format!("Unknown perspective: {}. Use model or team.", s)),
        }
    }
}

/// Venue restriction for the target team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Any,
    Home,
    Away,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(Role::Any),
            "home" => Ok(Role::Home),
            "away" => Ok(Role::Away),
            _ => Err(format!("Unknown role: {}. Use any, home, or away.", s)),
        }
    }
}

/// Incoming streak threshold: "3w" = 3+ wins, "4l" = 4+ losses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakRange {
    Wins(i32),
    Losses(i32),
}

impl StreakRange {
    pub fn contains(&self, streak: i32) -> bool {
        match *self {
            StreakRange::Wins(n) => streak >= n,
            StreakRange::Losses(n) => streak <= -n,
        }
    }
}

impl FromStr for StreakRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = || format!("Invalid streak range: {}. Use e.g. 3w or 4l.", s);

        let kind = s.chars().last().ok_or_else(invalid)?;
        let n: i32 = s[..s.len() - kind.len_utf8()]
            .trim_end_matches('+')
            .parse()
            .map_err(|_| invalid())?;

        match kind {
            'w' => Ok(StreakRange::Wins(n)),
            'l' => Ok(StreakRange::Losses(n)),
            _ => Err(invalid()),
        }
    }
}

/// Equality check on a named column: "Calc_Pick_Travel=Leaves"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub value: String,
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((column, value)) if !column.trim().is_empty() => Ok(Condition {
                column: column.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(format!("Invalid condition: {}. Use COLUMN=VALUE.", s)),
        }
    }
}

/// Scored flags for one selected game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub ats_win: bool,
    pub ml_win: bool,
    pub over: bool,
}

/// Selection criteria over derived rows
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub perspective: Perspective,
    /// Pick (model perspective) or either side (team perspective)
    pub team: Option<TeamCode>,
    pub role: Role,
    /// Market classification of the pick or of the target side
    pub class: Option<String>,
    pub home_streak: Option<StreakRange>,
    pub away_streak: Option<StreakRange>,
    pub conditions: Vec<Condition>,
}

impl GameFilter {
    pub fn matches(&self, row: &DerivedRow, columns: &ColumnConfig) -> bool {
        let selected = match self.perspective {
            Perspective::Model => self.matches_model(row),
            Perspective::Team => self.matches_team(row),
        };

        selected
            && self
                .home_streak
                .map_or(true, |r| r.contains(row.home.streak))
            && self
                .away_streak
                .map_or(true, |r| r.contains(row.away.streak))
            && self
                .conditions
                .iter()
                .all(|c| row.field(&c.column, columns).as_deref() == Some(c.value.as_str()))
    }

    fn matches_model(&self, row: &DerivedRow) -> bool {
        self.team.as_ref().map_or(true, |t| &row.record.pick == t)
            && self
                .class
                .as_ref()
                .map_or(true, |c| &row.pick().class == c)
    }

    fn matches_team(&self, row: &DerivedRow) -> bool {
        let side_ok = |side: &SideContext| {
            self.team.as_ref().map_or(true, |t| &side.team == t)
                && self.class.as_ref().map_or(true, |c| &side.class == c)
        };

        match self.role {
            Role::Home => side_ok(&row.home),
            Role::Away => side_ok(&row.away),
            Role::Any => side_ok(&row.home) || side_ok(&row.away),
        }
    }

    pub fn apply<'a>(&self, rows: &'a [DerivedRow], columns: &ColumnConfig) -> Vec<&'a DerivedRow> {
        rows.iter().filter(|r| self.matches(r, columns)).collect()
    }

    /// Flags scored from this filter's perspective
    pub fn outcome(&self, row: &DerivedRow) -> Outcome {
        let over = row.record.ou_result == OverUnder::Over;

        match self.perspective {
            Perspective::Model => Outcome {
                ats_win: row.record.ats_result.is_hit(),
                ml_win: row.record.ml_result.is_hit(),
                over,
            },
            Perspective::Team => {
                let side = self
                    .team
                    .as_ref()
                    .and_then(|t| row.team(t))
                    .unwrap_or(&row.home);
                Outcome {
                    ats_win: side.covered,
                    ml_win: side.won,
                    over,
                }
            }
        }
    }
}
