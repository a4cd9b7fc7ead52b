//! Backtest Metrics
//!
//! ROI, win rate, profit factor, drawdown and monthly returns of a completed
//! simulation, plus per-dimension breakdowns of the bet log.
//!
//! Values are kept at full precision here. Rounding to 2 decimal places
//! happens once, when a result is turned into a response.

use super::simulator::SimulatedBet;
use crate::models::TimelinePoint;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Round to 2 decimal places, mapping NaN and infinities to 0
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0 // drop negative zero
    } else {
        rounded
    }
}

/// Percentage return from `start` to `end`
pub fn roi(start: f64, end: f64) -> f64 {
    if start == 0.0 {
        return 0.0;
    }
    (end - start) / start * 100.0
}

/// Won share of settled bets in percent, 0 without bets
pub fn win_rate(won: usize, lost: usize) -> f64 {
    let settled = won + lost;
    if settled == 0 {
        return 0.0;
    }
    won as f64 / settled as f64 * 100.0
}

/// Gross winnings over gross losses, 0 when nothing was lost
pub fn profit_factor(gross_win: f64, gross_loss: f64) -> f64 {
    if gross_loss > 0.0 {
        gross_win / gross_loss
    } else {
        0.0
    }
}

/// Win/loss counters for a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTotals {
    pub won: usize,
    pub lost: usize,
    pub gross_win: f64,
    pub gross_loss: f64, // Positive magnitude
}

impl OutcomeTotals {
    pub fn record(&mut self, won: bool, profit: f64) {
        if won {
            self.won += 1;
            self.gross_win += profit;
        } else {
            self.lost += 1;
            self.gross_loss += -profit;
        }
    }

    pub fn settled(&self) -> usize {
        self.won + self.lost
    }
}

/// Running peak-to-trough drawdown in percent of the peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    /// Peak starts at the opening bankroll
    pub fn new(opening: f64) -> Self {
        Self {
            peak: opening,
            max_drawdown: 0.0,
        }
    }

    pub fn update(&mut self, bankroll: f64) {
        self.peak = self.peak.max(bankroll);
        if self.peak > 0.0 {
            let drawdown = (self.peak - bankroll) / self.peak * 100.0;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }
}

/// Percentage return for every calendar month the timeline touches
///
/// A month opens at the previous month's closing bankroll. The first month
/// opens at `opening` when given, otherwise at its own first entry. The last
/// month is closed at the final entry.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use valuebet::backtesting::metrics::monthly_returns;
/// use valuebet::models::TimelinePoint;
///
/// let point = |m, d, bankroll| TimelinePoint { date: NaiveDate::from_ymd_opt(2024, m, d).unwrap(), bankroll };
/// let timeline = [point(1, 5, 1000.0), point(1, 20, 1100.0), point(2, 10, 1210.0)];
/// let returns = monthly_returns(None, &timeline);
/// assert!((returns[0] - 10.0).abs() < 1e-9 && (returns[1] - 10.0).abs() < 1e-9);
/// ```
pub fn monthly_returns(opening: Option<f64>, timeline: &[TimelinePoint]) -> Vec<f64> {
    let Some(first) = timeline.first() else {
        return Vec::new();
    };

    let mut returns = Vec::new();
    let mut month = (first.date.year(), first.date.month());
    let mut month_open = opening.unwrap_or(first.bankroll);
    let mut month_close = first.bankroll;

    for point in &timeline[1..] {
        let key = (point.date.year(), point.date.month());
        if key != month {
            returns.push(roi(month_open, month_close));
            month = key;
            month_open = month_close;
        }
        month_close = point.bankroll;
    }

    // Close the month still open
    returns.push(roi(month_open, month_close));
    returns
}

/// Headline metrics of a completed simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub roi: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub monthly_returns: Vec<f64>,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            roi: 0.0,
            win_rate: 0.0,
            profit_factor: 0.0,
            max_drawdown: 0.0,
            monthly_returns: Vec::new(),
        }
    }
}

impl PerformanceMetrics {
    pub fn calculate(
        starting_bankroll: f64,
        final_bankroll: f64,
        totals: &OutcomeTotals,
        max_drawdown: f64,
        timeline: &[TimelinePoint],
    ) -> Self {
        Self {
            roi: roi(starting_bankroll, final_bankroll),
            win_rate: win_rate(totals.won, totals.lost),
            profit_factor: profit_factor(totals.gross_win, totals.gross_loss),
            max_drawdown,
            monthly_returns: monthly_returns(Some(starting_bankroll), timeline),
        }
    }

    /// Copy rounded to 2 decimal places
    pub fn rounded(&self) -> Self {
        Self {
            roi: round2(self.roi),
            win_rate: round2(self.win_rate),
            profit_factor: round2(self.profit_factor),
            max_drawdown: round2(self.max_drawdown),
            monthly_returns: self.monthly_returns.iter().map(|&r| round2(r)).collect(),
        }
    }
}

/// Analysis results by dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAnalysis {
    pub key: String,
    pub bets: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub stake: f64,
    pub profit: f64,
    pub roi: f64, // profit / stake in percent
}

impl DimensionAnalysis {
    /// Summarise `(won, stake, profit)` rows under one key
    pub fn summarize<I>(key: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = (bool, f64, f64)>,
    {
        let mut bets = 0;
        let mut wins = 0;
        let mut stake = 0.0;
        let mut profit = 0.0;
        for (won, row_stake, row_profit) in rows {
            bets += 1;
            if won {
                wins += 1;
            }
            stake += row_stake;
            profit += row_profit;
        }

        Self {
            key: key.to_string(),
            bets,
            wins,
            win_rate: win_rate(wins, bets - wins),
            stake,
            profit,
            roi: if stake > 0.0 { profit / stake * 100.0 } else { 0.0 },
        }
    }
}

/// Odds bands used in breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OddsBand {
    Short,  // < 2.0
    Medium, // 2.0 - 3.5
    Long,   // >= 3.5
}

impl OddsBand {
    pub fn of(odds: f64) -> Self {
        if odds < 2.0 {
            OddsBand::Short
        } else if odds < 3.5 {
            OddsBand::Medium
        } else {
            OddsBand::Long
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OddsBand::Short => "<2",
            OddsBand::Medium => "2-3.5",
            OddsBand::Long => ">=3.5",
        }
    }
}

/// Analyze simulated bets by category, sorted by category name
pub fn analyze_by_category(bets: &[SimulatedBet]) -> Vec<DimensionAnalysis> {
    let mut grouped: BTreeMap<&str, Vec<&SimulatedBet>> = BTreeMap::new();
    for bet in bets {
        grouped.entry(bet.category.as_str()).or_default().push(bet);
    }

    grouped
        .into_iter()
        .map(|(key, group)| DimensionAnalysis::summarize(key, group.iter().map(|b| (b.won, b.stake, b.profit))))
        .collect()
}

/// Analyze simulated bets by odds band, shortest odds first
pub fn analyze_by_odds_band(bets: &[SimulatedBet]) -> Vec<DimensionAnalysis> {
    let mut grouped: BTreeMap<OddsBand, Vec<&SimulatedBet>> = BTreeMap::new();
    for bet in bets {
        grouped.entry(OddsBand::of(bet.odds)).or_default().push(bet);
    }

    grouped
        .into_iter()
        .map(|(band, group)| {
            DimensionAnalysis::summarize(band.label(), group.iter().map(|b| (b.won, b.stake, b.profit)))
        })
        .collect()
}
