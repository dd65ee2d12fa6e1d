//! Derived row representation
//!
//! One input game plus the context of both teams as of tip-off.

use super::previous::Previous;
use super::schedule::{RestBucket, Travel};
use crate::{ColumnConfig, GameRecord, Hit, OverUnder, TeamCode};

/// Which team of a game a view describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
    /// The model's pick
    Pick,
    /// The team opposing the pick
    Opp,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Home, Side::Away, Side::Pick, Side::Opp];

    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
            Side::Pick => "Pick",
            Side::Opp => "Opp",
        }
    }
}

/// Per-team metrics emitted for every side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Streak,
    Rest,
    Travel,
    PrevAts,
    PrevMl,
    PrevOu,
    Class,
    Covered,
    Won,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Streak,
        Metric::Rest,
        Metric::Travel,
        Metric::PrevAts,
        Metric::PrevMl,
        Metric::PrevOu,
        Metric::Class,
        Metric::Covered,
        Metric::Won,
    ];

    /// Output column name for this metric on a side
    pub fn column(&self, side: Side) -> String {
        let s = side.label();
        match self {
            Metric::Streak => format!("Calc_{}_Streak", s),
            Metric::Rest => format!("Calc_{}_Rest", s),
            Metric::Travel => format!("Calc_{}_Travel", s),
            Metric::PrevAts => format!("Calc_{}_Prev_ATS", s),
            Metric::PrevMl => format!("Calc_{}_Prev_ML", s),
            Metric::PrevOu => format!("Calc_{}_Prev_OU", s),
            Metric::Class => format!("Real_{}_Class", s),
            Metric::Covered => format!("Real_{}_Covered", s),
            Metric::Won => format!("Real_{}_Won", s),
        }
    }
}

/// Column holding the formatted game date
pub const DATE_STR_COLUMN: &str = "Fecha_Str";
pub const HOME_TEAM_COLUMN: &str = "HomeTeam";
pub const AWAY_TEAM_COLUMN: &str = "AwayTeam";

/// All derived column names, in output order
pub fn derived_columns() -> Vec<String> {
    let mut columns = vec![
        HOME_TEAM_COLUMN.to_string(),
        AWAY_TEAM_COLUMN.to_string(),
        DATE_STR_COLUMN.to_string(),
    ];
    for side in Side::ALL {
        for metric in Metric::ALL {
            columns.push(metric.column(side));
        }
    }
    columns
}

/// One team's context for a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideContext {
    pub team: TeamCode,
    /// Streak before this game
    pub streak: i32,
    pub rest: RestBucket,
    pub travel: Travel,
    pub prev_ats: Previous<Hit>,
    pub prev_ml: Previous<Hit>,
    pub prev_ou: Previous<OverUnder>,
    /// Market classification from this team's point of view
    pub class: String,
    pub covered: bool,
    pub won: bool,
}

impl SideContext {
    /// Wire value for a metric
    pub fn value(&self, metric: Metric) -> String {
        match metric {
            Metric::Streak => self.streak.to_string(),
            Metric::Rest => self.rest.as_str().to_string(),
            Metric::Travel => self.travel.as_str().to_string(),
            Metric::PrevAts => self.prev_ats.as_str().to_string(),
            Metric::PrevMl => self.prev_ml.as_str().to_string(),
            Metric::PrevOu => self.prev_ou.as_str().to_string(),
            Metric::Class => self.class.clone(),
            Metric::Covered => self.covered.to_string(),
            Metric::Won => self.won.to_string(),
        }
    }
}

/// An input game augmented with both teams' context
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub record: GameRecord,
    pub home: SideContext,
    pub away: SideContext,
}

impl DerivedRow {
    pub fn pick(&self) -> &SideContext {
        if self.record.is_pick_home() {
            &self.home
        } else {
            &self.away
        }
    }

    pub fn opponent(&self) -> &SideContext {
        if self.record.is_pick_home() {
            &self.away
        } else {
            &self.home
        }
    }

    pub fn side(&self, side: Side) -> &SideContext {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
            Side::Pick => self.pick(),
            Side::Opp => self.opponent(),
        }
    }

    /// Context for a specific team, if it played in this game
    pub fn team(&self, team: &TeamCode) -> Option<&SideContext> {
        if &self.home.team == team {
            Some(&self.home)
        } else if &self.away.team == team {
            Some(&self.away)
        } else {
            None
        }
    }

    /// Derived column value by name
    pub fn derived_field(&self, name: &str) -> Option<String> {
        match name {
            HOME_TEAM_COLUMN => return Some(self.home.team.to_string()),
            AWAY_TEAM_COLUMN => return Some(self.away.team.to_string()),
            DATE_STR_COLUMN => return Some(self.record.date.format("%Y-%m-%d").to_string()),
            _ => {}
        }

        Side::ALL.iter().find_map(|side| {
            Metric::ALL
                .iter()
                .find(|m| m.column(*side) == name)
                .map(|m| self.side(*side).value(*m))
        })
    }

    /// Any input or derived column value by name
    pub fn field(&self, name: &str, columns: &ColumnConfig) -> Option<String> {
        let r = &self.record;
        if name == columns.date {
            Some(r.date.format("%Y-%m-%d").to_string())
        } else if name == columns.pick {
            Some(r.pick.to_string())
        } else if name == columns.ats_result {
            Some(r.ats_result.to_string())
        } else if name == columns.ml_result {
            Some(r.ml_result.to_string())
        } else if name == columns.ou_result {
            Some(r.ou_result.to_string())
        } else if name == columns.classification {
            Some(super::classification::pick_label(r.classification.as_deref()))
        } else {
            self.derived_field(name)
                .or_else(|| r.attribute(name).map(str::to_string))
        }
    }

    /// Ordered (column, value) pairs: input columns first, then derived
    pub fn to_columns(&self, columns: &ColumnConfig) -> Vec<(String, String)> {
        let r = &self.record;
        let mut out = vec![
            (columns.date.clone(), r.date.format("%Y-%m-%d").to_string()),
            (columns.pick.clone(), r.pick.to_string()),
            (columns.ats_result.clone(), r.ats_result.to_string()),
            (columns.ml_result.clone(), r.ml_result.to_string()),
            (columns.ou_result.clone(), r.ou_result.to_string()),
            (
                columns.classification.clone(),
                super::classification::pick_label(r.classification.as_deref()),
            ),
        ];
        out.extend(r.attributes.iter().cloned());
        for name in derived_columns() {
            if let Some(value) = self.derived_field(&name) {
                out.push((name, value));
            }
        }
        out
    }
}
