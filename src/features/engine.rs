//! Chronological feature derivation
//!
//! A single forward pass over date-sorted games. Each game is first derived
//! from the state left by earlier games, then folded into that state.

use super::classification;
use super::previous::{prev_ats, prev_ml, prev_ou};
use super::registry::{TeamSnapshot, TeamStateRegistry};
use super::result::GameResult;
use super::row::{DerivedRow, SideContext};
use super::schedule::{RestBucket, Travel};
use super::streak::StreakTracker;
use crate::{GameRecord, SkipReason, SkippedRow, TeamCode};

/// Reject records that would corrupt per-team state
pub fn validate(record: &GameRecord) -> Result<(), SkipReason> {
    if record.home_team.as_str().is_empty() || record.away_team.as_str().is_empty() {
        return Err(SkipReason::EmptyTeam);
    }
    if record.home_team == record.away_team {
        return Err(SkipReason::SameTeam(record.home_team.clone()));
    }
    if record.pick != record.home_team && record.pick != record.away_team {
        return Err(SkipReason::PickNotInGame {
            pick: record.pick.clone(),
            home: record.home_team.clone(),
            away: record.away_team.clone(),
        });
    }
    Ok(())
}

/// Derive a game's row from the state of strictly earlier games
pub fn derive_row(
    registry: &TeamStateRegistry,
    tracker: &StreakTracker,
    record: &GameRecord,
) -> DerivedRow {
    let result = GameResult::from_record(record);

    let pick_class = classification::pick_label(record.classification.as_deref());
    let opp_class = classification::mirror(record.classification.as_deref());
    let (home_class, away_class) = if record.is_pick_home() {
        (pick_class, opp_class)
    } else {
        (opp_class, pick_class)
    };

    let home = side_context(
        registry,
        tracker,
        record,
        &record.home_team,
        true,
        home_class,
        result.home_covered,
        result.home_won,
    );
    let away = side_context(
        registry,
        tracker,
        record,
        &record.away_team,
        false,
        away_class,
        result.away_covered,
        result.away_won,
    );

    DerivedRow {
        record: record.clone(),
        home,
        away,
    }
}

#[allow(clippy::too_many_arguments)]
fn side_context(
    registry: &TeamStateRegistry,
    tracker: &StreakTracker,
    record: &GameRecord,
    team: &TeamCode,
    is_home: bool,
    class: String,
    covered: bool,
    won: bool,
) -> SideContext {
    let last = registry.get(team);
    let last = last.as_ref();

    SideContext {
        team: team.clone(),
        streak: tracker.get(team),
        rest: RestBucket::from_snapshot(last, record.date),
        travel: Travel::from_snapshot(last, is_home),
        prev_ats: prev_ats(last),
        prev_ml: prev_ml(last),
        prev_ou: prev_ou(last),
        class,
        covered,
        won,
    }
}

/// Fold a derived game into team state (call AFTER derive_row)
pub fn advance_state(
    registry: &mut TeamStateRegistry,
    tracker: &mut StreakTracker,
    record: &GameRecord,
    derived: &DerivedRow,
) {
    for (side, is_home) in [(&derived.home, true), (&derived.away, false)] {
        registry.put(
            side.team.clone(),
            TeamSnapshot {
                date: record.date,
                covered: side.covered,
                won: side.won,
                ou: record.ou_result,
                was_home: is_home,
            },
        );
    }

    let (winner, loser) = if derived.home.won {
        (&record.home_team, &record.away_team)
    } else {
        (&record.away_team, &record.home_team)
    };
    tracker.advance(winner, loser);
}

/// Final state of one team after a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamState {
    pub team: TeamCode,
    pub streak: i32,
    pub last: TeamSnapshot,
}

/// Output of a full pass
#[derive(Debug, Default)]
pub struct Derivation {
    pub rows: Vec<DerivedRow>,
    pub skipped: Vec<SkippedRow>,
    registry: TeamStateRegistry,
    tracker: StreakTracker,
}

impl Derivation {
    /// Every team seen, sorted by code
    pub fn team_states(&self) -> Vec<TeamState> {
        let mut states: Vec<TeamState> = self
            .registry
            .teams()
            .map(|(team, last)| TeamState {
                team: team.clone(),
                streak: self.tracker.get(team),
                last: *last,
            })
            .collect();
        states.sort_by(|a, b| a.team.cmp(&b.team));
        states
    }
}

/// Runs the forward pass and owns the per-team state for its duration
#[derive(Debug, Default)]
pub struct FeatureEngine {
    registry: TeamStateRegistry,
    tracker: StreakTracker,
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive one game and advance state; rejected games leave state untouched
    pub fn process(&mut self, record: &GameRecord) -> Result<DerivedRow, SkipReason> {
        validate(record)?;

        let derived = derive_row(&self.registry, &self.tracker, record);
        advance_state(&mut self.registry, &mut self.tracker, record, &derived);

        log::debug!(
            "{} {} vs {}: streaks {}/{}, rest {}/{}",
            record.date,
            record.home_team,
            record.away_team,
            derived.home.streak,
            derived.away.streak,
            derived.home.rest,
            derived.away.rest
        );
        Ok(derived)
    }

    /// Sort games by date (stable on ties) and derive them all
    pub fn run(mut self, mut records: Vec<GameRecord>) -> Derivation {
        records.sort_by_key(|r| r.date);

        let mut rows = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();

        for record in &records {
            match self.process(record) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    log::warn!("Skipping line {}: {}", record.line, reason);
                    skipped.push(SkippedRow {
                        line: record.line,
                        reason,
                    });
                }
            }
        }

        log::info!(
            "Derived {} games for {} teams ({} skipped)",
            rows.len(),
            self.registry.len(),
            skipped.len()
        );

        Derivation {
            rows,
            skipped,
            registry: self.registry,
            tracker: self.tracker,
        }
    }

    pub fn registry(&self) -> &TeamStateRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &StreakTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hit, OverUnder};
    use chrono::NaiveDate;

    fn make_game(
        line: usize,
        date: NaiveDate,
        home: &str,
        away: &str,
        pick: &str,
        ats: Hit,
        ml: Hit,
    ) -> GameRecord {
        GameRecord {
            line,
            date,
            home_team: TeamCode::new(home),
            away_team: TeamCode::new(away),
            pick: TeamCode::new(pick),
            ats_result: ats,
            ml_result: ml,
            ou_result: OverUnder::Over,
            classification: Some("Favorito Pesado".to_string()),
            attributes: vec![],
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_bos_three_games() {
        let games = vec![
            // G1: BOS home, wins and covers
            make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::Si),
            // G2: BOS away next day, loses and fails to cover
            make_game(2, day(2), "MIA", "BOS", "BOS", Hit::No, Hit::No),
            // G3: BOS home four days later, wins and covers
            make_game(3, day(6), "BOS", "CHI", "BOS", Hit::Si, Hit::Si),
        ];

        let out = FeatureEngine::new().run(games);
        assert_eq!(out.rows.len(), 3);

        let g1 = &out.rows[0].home;
        assert_eq!(g1.rest.as_str(), "N/A");
        assert_eq!(g1.travel.as_str(), "N/A");
        assert_eq!(g1.streak, 0);

        let g2 = &out.rows[1].away;
        assert_eq!(g2.team.as_str(), "BOS");
        assert_eq!(g2.rest.as_str(), "0");
        assert_eq!(g2.travel, Travel::Leaves);
        assert_eq!(g2.streak, 1);
        assert_eq!(g2.prev_ats.as_str(), "SI");

        let g3 = &out.rows[2].home;
        assert_eq!(g3.rest.as_str(), "3+");
        assert_eq!(g3.travel, Travel::Returns);
        assert_eq!(g3.streak, -1);
        assert_eq!(g3.prev_ml.as_str(), "NO");

        let bos = out
            .team_states()
            .into_iter()
            .find(|s| s.team.as_str() == "BOS")
            .unwrap();
        assert_eq!(bos.streak, 1);
        assert_eq!(bos.last.date, day(6));
    }

    #[test]
    fn test_no_self_reference() {
        // A team's first game never sees its own outcome
        let game = make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::Si);
        let out = FeatureEngine::new().run(vec![game]);
        let row = &out.rows[0];

        assert_eq!(row.home.prev_ats.as_str(), "N/A");
        assert_eq!(row.away.prev_ml.as_str(), "N/A");
        assert_eq!(row.home.streak, 0);
        assert_eq!(row.away.streak, 0);
    }

    #[test]
    fn test_derive_does_not_mutate() {
        let registry = TeamStateRegistry::new();
        let tracker = StreakTracker::new();
        let game = make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::Si);

        let first = derive_row(&registry, &tracker, &game);
        let second = derive_row(&registry, &tracker, &game);
        assert_eq!(first, second);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let games = vec![
            make_game(1, day(5), "BOS", "NYK", "BOS", Hit::Si, Hit::Si),
            make_game(2, day(1), "NYK", "BOS", "NYK", Hit::Si, Hit::Si),
        ];

        let out = FeatureEngine::new().run(games);
        assert_eq!(out.rows[0].record.line, 2);
        assert_eq!(out.rows[1].home.travel, Travel::Returns);
        assert_eq!(out.rows[1].home.streak, -1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let games = vec![
            make_game(1, day(3), "BOS", "NYK", "BOS", Hit::Si, Hit::Si),
            make_game(2, day(3), "BOS", "MIA", "BOS", Hit::Si, Hit::Si),
        ];

        let out = FeatureEngine::new().run(games);
        assert_eq!(out.rows[0].record.line, 1);
        // Same-day second game sees the first one
        assert_eq!(out.rows[1].home.streak, 1);
        assert_eq!(out.rows[1].home.rest.as_str(), "0");
        assert_eq!(out.rows[1].home.travel, Travel::Homestand);
    }

    #[test]
    fn test_classification_mirror_by_side() {
        let mut game = make_game(1, day(1), "BOS", "NYK", "NYK", Hit::No, Hit::No);
        game.classification = Some("Underdog Pesado".to_string());

        let out = FeatureEngine::new().run(vec![game]);
        let row = &out.rows[0];
        assert_eq!(row.away.class, "Underdog Pesado");
        assert_eq!(row.home.class, "Favorito Pesado");
        assert_eq!(row.pick().class, "Underdog Pesado");
        // Away pick missed both: home covered and won
        assert!(row.home.covered && row.home.won);
        assert!(!row.away.covered && !row.away.won);
    }

    #[test]
    fn test_missing_classification() {
        let mut game = make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::Si);
        game.classification = None;

        let out = FeatureEngine::new().run(vec![game]);
        assert_eq!(out.rows[0].home.class, "N/A");
        assert_eq!(out.rows[0].away.class, "N/A");
    }

    #[test]
    fn test_bad_rows_skipped_without_state_change() {
        let games = vec![
            make_game(1, day(1), "BOS", "BOS", "BOS", Hit::Si, Hit::Si),
            make_game(2, day(2), "BOS", "NYK", "LAL", Hit::Si, Hit::Si),
            make_game(3, day(3), "", "NYK", "NYK", Hit::Si, Hit::Si),
            make_game(4, day(4), "BOS", "NYK", "BOS", Hit::Si, Hit::Si),
        ];

        let out = FeatureEngine::new().run(games);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.skipped.len(), 3);
        assert_eq!(out.skipped[0].line, 1);
        assert!(matches!(out.skipped[0].reason, SkipReason::SameTeam(_)));
        assert!(matches!(out.skipped[1].reason, SkipReason::PickNotInGame { .. }));
        assert_eq!(out.skipped[2].reason, SkipReason::EmptyTeam);

        // Surviving game is each team's first
        assert_eq!(out.rows[0].home.rest.as_str(), "N/A");
        assert_eq!(out.rows[0].away.streak, 0);
        assert_eq!(out.team_states().len(), 2);
    }

    #[test]
    fn test_pick_relative_views() {
        let games = vec![
            make_game(1, day(1), "BOS", "NYK", "BOS", Hit::No, Hit::Si),
            make_game(2, day(3), "MIA", "BOS", "BOS", Hit::Si, Hit::Si),
        ];

        let out = FeatureEngine::new().run(games);
        let row = &out.rows[1];
        assert_eq!(row.pick().team.as_str(), "BOS");
        assert_eq!(row.pick().prev_ats.as_str(), "NO");
        assert_eq!(row.pick().prev_ml.as_str(), "SI");
        assert_eq!(row.pick().rest.as_str(), "1");
        assert_eq!(row.opponent().team.as_str(), "MIA");
        assert_eq!(row.opponent().prev_ats.as_str(), "N/A");
    }

    #[test]
    fn test_rerun_is_identical() {
        let games = vec![
            make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::No),
            make_game(2, day(2), "NYK", "MIA", "MIA", Hit::No, Hit::Si),
            make_game(3, day(4), "MIA", "BOS", "BOS", Hit::Si, Hit::Si),
        ];

        let a = FeatureEngine::new().run(games.clone());
        let b = FeatureEngine::new().run(games);
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn test_streak_sign_matches_last_result() {
        let games = vec![
            make_game(1, day(1), "BOS", "NYK", "BOS", Hit::Si, Hit::Si),
            make_game(2, day(2), "NYK", "BOS", "NYK", Hit::Si, Hit::Si),
            make_game(3, day(3), "BOS", "NYK", "NYK", Hit::No, Hit::No),
        ];

        let mut engine = FeatureEngine::new();
        let bos = TeamCode::new("BOS");
        let mut expected = [1, -1, 1].into_iter();
        for g in &games {
            let row = engine.process(g).unwrap();
            let won = row.team(&bos).unwrap().won;
            let streak = engine.tracker().get(&bos);
            assert_eq!(streak > 0, won);
            assert_eq!(Some(streak), expected.next());
        }
        assert!(engine.registry().get(&bos).is_some());
    }
}
