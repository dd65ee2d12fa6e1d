//! Aggregate results over a selection of games

use std::fmt;

use super::filter::Outcome;
use crate::{OverUnder, SummaryConfig};

/// Stake risked on each ATS ticket
const STAKE: f64 = 100.0;

/// Aggregate ATS, moneyline and totals results
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub ats_wins: usize,
    pub ml_wins: usize,
    pub overs: usize,
    win_payout: f64,
    breakeven_rate: f64,
    alert_rate: f64,
    alert_min_games: usize,
}

impl Summary {
    pub fn new(config: &SummaryConfig) -> Self {
        Summary {
            games: 0,
            ats_wins: 0,
            ml_wins: 0,
            overs: 0,
            win_payout: config.win_payout,
            breakeven_rate: config.breakeven_rate,
            alert_rate: config.alert_rate,
            alert_min_games: config.alert_min_games,
        }
    }

    pub fn from_outcomes<I: IntoIterator<Item = Outcome>>(outcomes: I, config: &SummaryConfig) -> Self {
        let mut summary = Self::new(config);
        for outcome in outcomes {
            summary.update(outcome);
        }
        summary
    }

    pub fn update(&mut self, outcome: Outcome) {
        self.games += 1;
        self.ats_wins += outcome.ats_win as usize;
        self.ml_wins += outcome.ml_win as usize;
        self.overs += outcome.over as usize;
    }

    fn pct(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64 * 100.0
        }
    }

    /// ATS win rate, percent
    pub fn ats_rate(&self) -> f64 {
        self.pct(self.ats_wins)
    }

    /// Moneyline win rate, percent
    pub fn ml_rate(&self) -> f64 {
        self.pct(self.ml_wins)
    }

    /// Share of games going over, percent
    pub fn over_rate(&self) -> f64 {
        self.pct(self.overs)
    }

    /// Flat-stake ATS return on investment, percent
    pub fn roi(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        let losses = (self.games - self.ats_wins) as f64;
        let profit = self.ats_wins as f64 * self.win_payout - losses * STAKE;
        profit / (self.games as f64 * STAKE) * 100.0
    }

    /// ATS rate above (positive) or below the break-even rate
    pub fn breakeven_delta(&self) -> f64 {
        self.ats_rate() - self.breakeven_rate
    }

    /// Majority totals outcome and its share
    pub fn tendency(&self) -> (OverUnder, f64) {
        let over = self.over_rate();
        if over > 50.0 {
            (OverUnder::Over, over)
        } else {
            (OverUnder::Under, 100.0 - over)
        }
    }

    /// Strong ATS rate over a meaningful sample
    pub fn is_hot(&self) -> bool {
        self.games >= self.alert_min_games && self.ats_rate() >= self.alert_rate
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.games == 0 {
            return write!(f, "No games match the selection");
        }

        let (side, share) = self.tendency();
        writeln!(f, "Games:     {}", self.games)?;
        writeln!(
            f,
            "ATS:       {}/{} ({:.1}%, {:+.1}% vs break-even)",
            self.ats_wins,
            self.games,
            self.ats_rate(),
            self.breakeven_delta()
        )?;
        writeln!(f, "ML:        {}/{} ({:.1}%)", self.ml_wins, self.games, self.ml_rate())?;
        writeln!(f, "ROI (ATS): {:+.1}%", self.roi())?;
        write!(f, "O/U:       {} {:.1}%", side.as_str().to_uppercase(), share)?;
        if self.is_hot() {
            write!(f, "\nALERT: {:.1}% ATS win rate", self.ats_rate())?;
        }
        Ok(())
    }
}
