//! Live Analytics
//!
//! Performance report over a user's settled bet ledger: totals, ROI, streaks,
//! per-category breakdown, daily profit and model accuracy. Every dashboard
//! variation (value bets only, category subsets) is an [`AnalyticsOptions`]
//! setting on the same aggregator.

use super::streaks::{SettledOutcome, StreakAnalyzer, StreakSummary};
use crate::backtesting::metrics::{round2, win_rate, DimensionAnalysis};
use crate::core::filter::{RecordFilter, Timeframe, WindowAnchor};
use crate::error::ValidationError;
use crate::models::{AnalyticsRequest, BetRecord, BetStatus, TimelinePoint};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Bankroll a growth curve starts from unless told otherwise
pub const DEFAULT_STARTING_BANKROLL: f64 = 1000.0;

/// Aggregation settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsOptions {
    pub timeframe: Timeframe,
    /// Restrict to one user's bets, `None` takes the whole ledger
    pub user_id: Option<String>,
    pub value_bets_only: bool,
    pub categories: Option<Vec<String>>,
}

impl TryFrom<&AnalyticsRequest> for AnalyticsOptions {
    type Error = ValidationError;

    fn try_from(req: &AnalyticsRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            timeframe: req.timeframe.parse()?,
            user_id: Some(req.user_id.clone()),
            ..Default::default()
        })
    }
}

/// Performance report, rounded to 2 decimal places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub timeframe: Timeframe,
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    /// Pending bets in the window, not counted anywhere else
    pub pending_bets: usize,
    pub total_staked: f64,
    pub profit_loss: f64,
    pub roi: f64,
    pub win_rate: f64,
    pub average_odds: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub streaks: StreakSummary,
    /// Won share of settled value bets in percent
    pub ai_accuracy: f64,
    pub category_breakdown: Vec<DimensionAnalysis>,
    pub daily_profit_loss: BTreeMap<NaiveDate, f64>,
}

/// Live analytics aggregator
#[derive(Debug, Clone, Default)]
pub struct LiveAnalyticsAggregator {
    options: AnalyticsOptions,
}

impl LiveAnalyticsAggregator {
    pub fn new(options: AnalyticsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    /// Build the report over the window ending at wall-clock time
    pub fn analyze_now(&self, bets: &[BetRecord]) -> AnalyticsReport {
        self.analyze(bets, Utc::now())
    }

    /// Build the report over the window ending at `now`
    pub fn analyze(&self, bets: &[BetRecord], now: DateTime<Utc>) -> AnalyticsReport {
        let filter = RecordFilter::window(self.options.timeframe, WindowAnchor::At(now))
            .with_value_bets_only(self.options.value_bets_only)
            .with_categories(self.options.categories.clone());

        let mut in_window: Vec<&BetRecord> = filter
            .apply(bets)
            .into_iter()
            .filter(|b| self.options.user_id.as_ref().map_or(true, |user| &b.user_id == user))
            .collect();
        in_window.sort_by_key(|b| b.placed_at);

        let pending_bets = in_window.iter().filter(|b| b.status == BetStatus::Pending).count();
        let settled: Vec<&BetRecord> = in_window.into_iter().filter(|b| b.status != BetStatus::Pending).collect();

        let report = self.build_report(&settled, pending_bets);
        info!(
            timeframe = %self.options.timeframe,
            bets = report.total_bets,
            pending = report.pending_bets,
            profit_loss = report.profit_loss,
            "analytics report built"
        );
        report
    }

    fn build_report(&self, settled: &[&BetRecord], pending_bets: usize) -> AnalyticsReport {
        let total_bets = settled.len();
        let won_bets = settled.iter().filter(|b| b.is_won()).count();
        let lost_bets = total_bets - won_bets;

        let total_staked: f64 = settled.iter().map(|b| b.stake).sum();
        let profit_loss: f64 = settled.iter().map(|b| b.profit).sum();
        let average_odds = if total_bets > 0 {
            settled.iter().map(|b| b.odds).sum::<f64>() / total_bets as f64
        } else {
            0.0
        };

        // Zero on a ledger with no wins (or no losses)
        let max_profit = settled.iter().map(|b| b.profit).fold(0.0, f64::max);
        let max_loss = settled.iter().map(|b| b.profit).fold(0.0, f64::min);

        let streaks = StreakAnalyzer::analyze(settled.iter().map(|b| SettledOutcome {
            won: b.is_won(),
            profit: b.profit,
        }));

        let value_bets: Vec<&&BetRecord> = settled.iter().filter(|b| b.is_value_bet).collect();
        let value_wins = value_bets.iter().filter(|b| b.is_won()).count();
        let ai_accuracy = win_rate(value_wins, value_bets.len() - value_wins);

        AnalyticsReport {
            timeframe: self.options.timeframe,
            total_bets,
            won_bets,
            lost_bets,
            pending_bets,
            total_staked: round2(total_staked),
            profit_loss: round2(profit_loss),
            roi: round2(if total_staked > 0.0 { profit_loss / total_staked * 100.0 } else { 0.0 }),
            win_rate: round2(win_rate(won_bets, lost_bets)),
            average_odds: round2(average_odds),
            max_profit: round2(max_profit),
            max_loss: round2(max_loss),
            streaks: StreakSummary {
                max_win: round2(streaks.max_win),
                max_loss: round2(streaks.max_loss),
                ..streaks
            },
            ai_accuracy: round2(ai_accuracy),
            category_breakdown: category_breakdown(settled),
            daily_profit_loss: daily_profit_loss(settled),
        }
    }
}

/// Count, win rate and profit per category, sorted by category name
fn category_breakdown(settled: &[&BetRecord]) -> Vec<DimensionAnalysis> {
    let mut grouped: BTreeMap<&str, Vec<&BetRecord>> = BTreeMap::new();
    for bet in settled {
        grouped.entry(bet.category.as_str()).or_default().push(bet);
    }

    grouped
        .into_iter()
        .map(|(category, group)| {
            let summary = DimensionAnalysis::summarize(category, group.iter().map(|b| (b.is_won(), b.stake, b.profit)));
            DimensionAnalysis {
                win_rate: round2(summary.win_rate),
                stake: round2(summary.stake),
                profit: round2(summary.profit),
                roi: round2(summary.roi),
                ..summary
            }
        })
        .collect()
}

/// Profit summed per UTC calendar day of placement
fn daily_profit_loss(settled: &[&BetRecord]) -> BTreeMap<NaiveDate, f64> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for bet in settled {
        *daily.entry(bet.placed_at.date_naive()).or_insert(0.0) += bet.profit;
    }
    daily.values_mut().for_each(|v| *v = round2(*v));
    daily
}

/// Cumulative bankroll over settled, non-deleted bets in placement order
///
/// One point per bet, dated by the UTC day it was placed.
pub fn bankroll_growth(bets: &[BetRecord], starting_bankroll: f64) -> Vec<TimelinePoint> {
    let mut settled: Vec<&BetRecord> = bets
        .iter()
        .filter(|b| b.status != BetStatus::Pending && !b.is_deleted)
        .collect();
    settled.sort_by_key(|b| b.placed_at);

    let mut bankroll = starting_bankroll;
    settled
        .into_iter()
        .map(|bet| {
            if bet.profit.is_finite() {
                bankroll += bet.profit;
            }
            TimelinePoint {
                date: bet.placed_at.date_naive(),
                bankroll: round2(bankroll),
            }
        })
        .collect()
}
