//! Game sheet loading
//!
//! Reads picked-game sheets exported to CSV and normalizes their columns
//! into `GameRecord`s. Rows that cannot be decoded are reported, not loaded.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use regex::Regex;

use crate::{
    ColumnConfig, CourtsideError, GameRecord, Hit, OverUnder, Result, SkipReason, SkippedRow,
    TeamCode,
};

/// Games read from a source, plus the rows that could not be decoded
#[derive(Debug, Default)]
pub struct LoadedGames {
    pub games: Vec<GameRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Trait for anything that provides game records
pub trait GameSource {
    /// Human-readable source name for logs
    fn name(&self) -> String;

    /// Load every game the source holds
    fn load(&self) -> Result<LoadedGames>;
}

/// CSV file source
pub struct CsvSource {
    path: PathBuf,
    columns: ColumnConfig,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(path: P, columns: ColumnConfig) -> Self {
        CsvSource {
            path: path.as_ref().to_path_buf(),
            columns,
        }
    }

    /// Parse CSV from any reader
    pub fn read<R: Read>(reader: R, columns: &ColumnConfig) -> Result<LoadedGames> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let layout = Layout::resolve(&headers, columns)?;
        let matchup = MatchupParser::new()?;

        let mut loaded = LoadedGames::default();
        for (i, row) in rdr.byte_records().enumerate() {
            let line = i + 1;
            let decoded = StringRecord::from_byte_record(row?)
                .map_err(|e| {
                    let column = headers.get(e.utf8_error().field()).unwrap_or_default();
                    SkipReason::InvalidEncoding(column.to_string())
                })
                .and_then(|row| {
                    layout.decode(&headers, &row, line, &matchup, columns.day_first)
                });
            match decoded {
                Ok(game) => loaded.games.push(game),
                Err(reason) => {
                    log::warn!("Rejecting line {}: {}", line, reason);
                    loaded.skipped.push(SkippedRow { line, reason });
                }
            }
        }

        Ok(loaded)
    }
}

impl GameSource for CsvSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<LoadedGames> {
        let file = std::fs::File::open(&self.path)?;
        let loaded = Self::read(file, &self.columns)?;
        log::info!(
            "Loaded {} games from {} ({} rejected)",
            loaded.games.len(),
            self.name(),
            loaded.skipped.len()
        );
        Ok(loaded)
    }
}

/// Where each team comes from in the sheet
enum TeamColumns {
    Separate { home: usize, away: usize },
    Matchup(usize),
}

/// Column indices resolved against a header row
struct Layout {
    date: (usize, String),
    teams: TeamColumns,
    pick: (usize, String),
    ats: (usize, String),
    ml: (usize, String),
    ou: (usize, String),
    classification: Option<usize>,
}

impl Layout {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        let teams = match (
            find_column(headers, &columns.home_team),
            find_column(headers, &columns.away_team),
        ) {
            (Some(home), Some(away)) => TeamColumns::Separate { home, away },
            _ => TeamColumns::Matchup(require_column(headers, &columns.matchup)?.0),
        };

        Ok(Layout {
            date: require_column(headers, &columns.date)?,
            teams,
            pick: require_column(headers, &columns.pick)?,
            ats: require_column(headers, &columns.ats_result)?,
            ml: require_column(headers, &columns.ml_result)?,
            ou: require_column(headers, &columns.ou_result)?,
            classification: find_column(headers, &columns.classification),
        })
    }

    /// Columns turned into typed fields; the rest pass through
    fn is_consumed(&self, idx: usize) -> bool {
        let team = match self.teams {
            TeamColumns::Separate { home, away } => idx == home || idx == away,
            TeamColumns::Matchup(_) => false,
        };
        team || [self.date.0, self.pick.0, self.ats.0, self.ml.0, self.ou.0].contains(&idx)
            || self.classification == Some(idx)
    }

    fn decode(
        &self,
        headers: &StringRecord,
        row: &StringRecord,
        line: usize,
        matchup: &MatchupParser,
        day_first: bool,
    ) -> std::result::Result<GameRecord, SkipReason> {
        let (home_team, away_team) = match self.teams {
            TeamColumns::Separate { home, away } => {
                let home = row.get(home).map(str::trim).unwrap_or_default();
                let away = row.get(away).map(str::trim).unwrap_or_default();
                if home.is_empty() || away.is_empty() {
                    return Err(SkipReason::EmptyTeam);
                }
                (TeamCode::new(home), TeamCode::new(away))
            }
            TeamColumns::Matchup(idx) => {
                let raw = row.get(idx).unwrap_or_default();
                matchup
                    .parse(raw)
                    .ok_or_else(|| SkipReason::UnparsedMatchup(raw.to_string()))?
            }
        };

        let date_raw = cell(row, &self.date)?;
        let date = parse_date(date_raw, day_first).ok_or_else(|| SkipReason::InvalidDate(date_raw.to_string()))?;

        let ats_result = hit(row, &self.ats)?;
        let ml_result = hit(row, &self.ml)?;

        let ou_raw = cell(row, &self.ou)?;
        let ou_result = OverUnder::parse(ou_raw).ok_or_else(|| SkipReason::InvalidValue {
            column: self.ou.1.clone(),
            value: ou_raw.to_string(),
        })?;

        let classification = self
            .classification
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let attributes = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.is_consumed(*idx))
            .map(|(idx, name)| {
                (
                    name.to_string(),
                    row.get(idx).unwrap_or_default().to_string(),
                )
            })
            .collect();

        Ok(GameRecord {
            line,
            date,
            home_team,
            away_team,
            pick: TeamCode::new(cell(row, &self.pick)?),
            ats_result,
            ml_result,
            ou_result,
            classification,
            attributes,
        })
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &StringRecord, name: &str) -> Result<(usize, String)> {
    find_column(headers, name)
        .map(|idx| (idx, name.to_string()))
        .ok_or_else(|| CourtsideError::MissingColumn(name.to_string()))
}

/// Trimmed, non-empty cell value
fn cell<'r>(
    row: &'r StringRecord,
    (idx, name): &(usize, String),
) -> std::result::Result<&'r str, SkipReason> {
    match row.get(*idx).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SkipReason::MissingField(name.clone())),
    }
}

fn hit(row: &StringRecord, col: &(usize, String)) -> std::result::Result<Hit, SkipReason> {
    let raw = cell(row, col)?;
    Hit::parse(raw).ok_or_else(|| SkipReason::InvalidValue {
        column: col.1.clone(),
        value: raw.to_string(),
    })
}

/// Splits "BOS Celtics vs NYK Knicks" into team codes
pub struct MatchupParser {
    code: Regex,
}

impl MatchupParser {
    pub fn new() -> Result<Self> {
        let code = Regex::new(r"^([A-Z]+)").map_err(|e| CourtsideError::Parse(e.to_string()))?;
        Ok(MatchupParser { code })
    }

    /// Leading uppercase code of each side; None unless exactly two sides
    pub fn parse(&self, raw: &str) -> Option<(TeamCode, TeamCode)> {
        let parts: Vec<&str> = raw.trim().split(" vs ").collect();
        if parts.len() != 2 {
            return None;
        }

        let code = |part: &str| {
            self.code
                .captures(part.trim())
                .and_then(|c| c.get(1))
                .map(|m| TeamCode::new(m.as_str()))
        };
        Some((code(parts[0])?, code(parts[1])?))
    }
}

/// Parse a sheet date, dropping any time component.
///
/// Slash dates are month-first unless `day_first` is set.
pub fn parse_date(raw: &str, day_first: bool) -> Option<NaiveDate> {
    let raw = raw.trim();

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    let slash = if day_first { "%d/%m/%Y" } else { "%m/%d/%Y" };
    for fmt in ["%Y-%m-%d", slash] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    None
}
