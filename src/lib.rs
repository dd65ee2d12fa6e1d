//! Chronological game-context derivation
//!
//! Replays a date-ordered history of picked basketball games and derives,
//! for every game, each team's rest, travel pattern, streak and previous
//! results as they stood before tip-off.

pub mod analysis;
pub mod data;
pub mod features;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Short team code as it appears in the source sheet (e.g. "BOS")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamCode(pub String);

impl TeamCode {
    pub fn new(code: impl Into<String>) -> Self {
        TeamCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A "SI"/"NO" betting result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hit {
    Si,
    No,
}

impl Hit {
    pub fn from_bool(hit: bool) -> Self {
        if hit {
            Hit::Si
        } else {
            Hit::No
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Hit::Si)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hit::Si => "SI",
            Hit::No => "NO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SI" => Some(Hit::Si),
            "NO" => Some(Hit::No),
            _ => None,
        }
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Total points outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverUnder {
    Over,
    Under,
}

impl OverUnder {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverUnder::Over => "Over",
            OverUnder::Under => "Under",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "over" => Some(OverUnder::Over),
            "under" => Some(OverUnder::Under),
            _ => None,
        }
    }
}

impl fmt::Display for OverUnder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single picked game from the source sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 1-based data line in the source, used when reporting skipped rows
    pub line: usize,
    pub date: NaiveDate,
    pub home_team: TeamCode,
    pub away_team: TeamCode,
    /// Team selected by the upstream model
    pub pick: TeamCode,
    pub ats_result: Hit,
    pub ml_result: Hit,
    pub ou_result: OverUnder,
    /// Market classification of the pick ("Favorito Pesado", "Underdog", ...)
    pub classification: Option<String>,
    /// Columns carried through untouched, in source order
    pub attributes: Vec<(String, String)>,
}

impl GameRecord {
    /// Check if the pick is the home team
    pub fn is_pick_home(&self) -> bool {
        self.pick == self.home_team
    }

    /// Team opposing the pick
    pub fn opponent(&self) -> &TeamCode {
        if self.is_pick_home() {
            &self.away_team
        } else {
            &self.home_team
        }
    }

    /// Look up a passthrough attribute by column name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum CourtsideError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column in source: {0}")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CourtsideError>;

/// Why a source row was left out of the fold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("cannot split matchup into home/away teams: {0:?}")]
    UnparsedMatchup(String),

    #[error("missing value for column {0}")]
    MissingField(String),

    #[error("invalid value {value:?} in column {column}")]
    InvalidValue { column: String, value: String },

    #[error("invalid UTF-8 in column {0}")]
    InvalidEncoding(String),

    #[error("unparseable date {0:?}")]
    InvalidDate(String),

    #[error("empty team code")]
    EmptyTeam,

    #[error("{0} listed as both home and away")]
    SameTeam(TeamCode),

    #[error("pick {pick} is neither {home} nor {away}")]
    PickNotInGame {
        pick: TeamCode,
        home: TeamCode,
        away: TeamCode,
    },
}

/// A source row that produced no derived output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data line in the source
    pub line: usize,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub columns: ColumnConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub input_path: String,
    pub output_path: String,
}

/// Source column names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub date: String,
    /// Composite "HOME vs AWAY" field used when team columns are absent
    pub matchup: String,
    pub home_team: String,
    pub away_team: String,
    pub pick: String,
    pub ats_result: String,
    pub ml_result: String,
    pub ou_result: String,
    pub classification: String,
    /// Read slash dates as DD/MM/YYYY instead of MM/DD/YYYY
    #[serde(default)]
    pub day_first: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Profit on a winning 100-unit ATS ticket
    pub win_payout: f64,
    /// ATS win rate needed to beat the vig, in percent
    pub breakeven_rate: f64,
    /// ATS win rate that raises the hot alert, in percent
    pub alert_rate: f64,
    pub alert_min_games: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                input_path: "data/datos.csv".to_string(),
                output_path: "data/datos_derived.csv".to_string(),
            },
            columns: ColumnConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            date: "Fecha".to_string(),
            matchup: "Partido (Local vs Visitante)".to_string(),
            home_team: "HomeTeam".to_string(),
            away_team: "AwayTeam".to_string(),
            pick: "Selección Modelo".to_string(),
            ats_result: "Resultado ATS".to_string(),
            ml_result: "Resultado ML".to_string(),
            ou_result: "Resultado O/U".to_string(),
            classification: "Tipo de Momio".to_string(),
            day_first: false,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            win_payout: 90.91,
            breakeven_rate: 52.4,
            alert_rate: 60.0,
            alert_min_games: 5,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CourtsideError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CourtsideError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CourtsideError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
