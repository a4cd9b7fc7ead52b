//! Backtest Simulator
//!
//! Replays a staking strategy over historical scored matches. One sequential
//! pass in date order: size the stake, skip it if unaffordable or degenerate,
//! settle it against the actual outcome and move the bankroll.
//!
//! A run never aborts. Parameters are validated when the engine is built.

use super::metrics::{round2, DrawdownTracker, OutcomeTotals, PerformanceMetrics};
use crate::analytics::streaks::{SettledOutcome, StreakAnalyzer, StreakSummary};
use crate::core::identity::MatchId;
use crate::error::ValidationError;
use crate::models::{DailyPoint, ScoredMatchRecord, SimulationParameters, SimulationResponse, TimelinePoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Individual simulated bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedBet {
    pub date: NaiveDate,
    pub match_id: MatchId,
    pub category: String,
    pub odds: f64,
    pub predicted_prob: f64,
    pub expected_value: f64,
    pub stake: f64,
    pub won: bool,
    pub profit: f64,
    pub bankroll_after: f64,
}

/// Why a record produced no bet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingDate,
    Unsettled,
    UndefinedStake,
    NonFiniteStake,
    NonPositiveStake,
    ExceedsBankroll,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MissingDate => "record has no date",
            SkipReason::Unsettled => "match has no result",
            SkipReason::UndefinedStake => "stake undefined for these odds",
            SkipReason::NonFiniteStake => "stake is not finite",
            SkipReason::NonPositiveStake => "stake is not positive",
            SkipReason::ExceedsBankroll => "stake exceeds bankroll",
        };
        f.write_str(reason)
    }
}

/// Simulation result at full precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub starting_bankroll: f64,
    pub final_bankroll: f64,
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    pub skipped_records: usize,
    pub timeline: Vec<TimelinePoint>,
    pub bets: Vec<SimulatedBet>,
    pub metrics: PerformanceMetrics,
    pub streaks: StreakSummary,
}

impl SimulationResult {
    /// Result of a run that placed no bets
    pub fn new(starting_bankroll: f64) -> Self {
        Self {
            starting_bankroll,
            final_bankroll: starting_bankroll,
            total_bets: 0,
            won_bets: 0,
            lost_bets: 0,
            skipped_records: 0,
            timeline: Vec::new(),
            bets: Vec::new(),
            metrics: PerformanceMetrics::default(),
            streaks: StreakSummary::default(),
        }
    }

    pub fn total_profit(&self) -> f64 {
        self.final_bankroll - self.starting_bankroll
    }

    pub fn total_staked(&self) -> f64 {
        self.bets.iter().map(|b| b.stake).sum()
    }

    /// Response shape, rounded to 2 decimal places
    pub fn to_response(&self) -> SimulationResponse {
        let metrics = self.metrics.rounded();
        SimulationResponse {
            starting_bankroll: round2(self.starting_bankroll),
            final_bankroll: round2(self.final_bankroll),
            total_bets: self.total_bets,
            won_bets: self.won_bets,
            lost_bets: self.lost_bets,
            win_rate: metrics.win_rate,
            roi: metrics.roi,
            max_drawdown: metrics.max_drawdown,
            profit_factor: metrics.profit_factor,
            daily_data: self
                .timeline
                .iter()
                .enumerate()
                .map(|(i, point)| DailyPoint {
                    day: i + 1,
                    date: point.date,
                    bankroll: round2(point.bankroll),
                })
                .collect(),
            monthly_returns: metrics.monthly_returns,
        }
    }
}

/// Backtest simulation engine
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: SimulationParameters,
}

impl SimulationEngine {
    /// Create an engine, rejecting invalid parameters
    pub fn new(params: SimulationParameters) -> Result<Self, ValidationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Filter the feed with the configured criteria, then simulate in date
    /// order (ties keep feed order)
    pub fn run(&self, records: &[ScoredMatchRecord]) -> SimulationResult {
        let mut eligible = self.params.record_filter().apply(records);
        eligible.sort_by_key(|r| r.date);
        info!(
            feed = records.len(),
            eligible = eligible.len(),
            timeframe = %self.params.timeframe,
            "running simulation"
        );
        self.simulate(eligible)
    }

    /// Simulate over records exactly in the order given, without filtering
    pub fn simulate<'a, I>(&self, records: I) -> SimulationResult
    where
        I: IntoIterator<Item = &'a ScoredMatchRecord>,
    {
        let starting_bankroll = self.params.starting_bankroll;
        let mut result = SimulationResult::new(starting_bankroll);
        let mut bankroll = starting_bankroll;
        let mut drawdown = DrawdownTracker::new(starting_bankroll);
        let mut totals = OutcomeTotals::default();
        let mut streaks = StreakAnalyzer::new();

        for record in records {
            let (date, stake) = match self.size_bet(bankroll, record) {
                Ok(sized) => sized,
                Err(reason) => {
                    debug!(match_id = %record.match_id, %reason, "skipping record");
                    result.skipped_records += 1;
                    continue;
                }
            };

            let won = record.is_win();
            let profit = if won { stake * (record.odds - 1.0) } else { -stake };
            bankroll += profit;

            result.timeline.push(TimelinePoint { date, bankroll });
            drawdown.update(bankroll);
            totals.record(won, profit);
            streaks.push(SettledOutcome { won, profit });

            result.bets.push(SimulatedBet {
                date,
                match_id: record.match_id.clone(),
                category: record.category.clone(),
                odds: record.odds,
                predicted_prob: record.predicted_prob,
                expected_value: record.expected_value,
                stake,
                won,
                profit,
                bankroll_after: bankroll,
            });
        }

        result.final_bankroll = bankroll;
        result.total_bets = totals.settled();
        result.won_bets = totals.won;
        result.lost_bets = totals.lost;
        result.metrics = PerformanceMetrics::calculate(
            starting_bankroll,
            bankroll,
            &totals,
            drawdown.max_drawdown(),
            &result.timeline,
        );
        result.streaks = streaks.finish();

        info!(
            bets = result.total_bets,
            skipped = result.skipped_records,
            final_bankroll = result.final_bankroll,
            roi = result.metrics.roi,
            "simulation finished"
        );
        result
    }

    /// Stake for the next record, or the reason it is skipped
    fn size_bet(&self, bankroll: f64, record: &ScoredMatchRecord) -> Result<(NaiveDate, f64), SkipReason> {
        let date = record.date.ok_or(SkipReason::MissingDate)?;
        if record.actual_outcome.is_none() {
            return Err(SkipReason::Unsettled);
        }

        let stake = self
            .params
            .staking
            .stake(bankroll, record)
            .ok_or(SkipReason::UndefinedStake)?;

        if !stake.is_finite() {
            Err(SkipReason::NonFiniteStake)
        } else if stake <= 0.0 {
            Err(SkipReason::NonPositiveStake)
        } else if stake > bankroll {
            Err(SkipReason::ExceedsBankroll)
        } else {
            Ok((date, stake))
        }
    }

    /// Print summary of simulation result
    pub fn print_summary(&self, result: &SimulationResult) {
        let metrics = result.metrics.rounded();

        println!("\n{}", "=".repeat(60));
        println!("SIMULATION RESULTS");
        println!("{}", "=".repeat(60));
        println!("Staking: {}", self.params.staking);
        println!("EV threshold: {:.2}", self.params.ev_threshold);
        println!("Odds range: {:.2} - {:.2}", self.params.min_odds, self.params.max_odds);
        println!("Timeframe: {}", self.params.timeframe);
        println!("{}", "-".repeat(60));
        println!("Total bets: {}", result.total_bets);
        println!("Won / lost: {} / {}", result.won_bets, result.lost_bets);
        println!("Skipped records: {}", result.skipped_records);
        println!("{}", "-".repeat(60));
        println!("Starting bankroll: {:.2}", result.starting_bankroll);
        println!("Final bankroll: {:.2}", result.final_bankroll);
        println!("Total staked: {:.2}", result.total_staked());
        println!("ROI: {:.2}%", metrics.roi);
        println!("Win rate: {:.2}%", metrics.win_rate);
        println!("Profit factor: {:.2}", metrics.profit_factor);
        println!("Max drawdown: {:.2}%", metrics.max_drawdown);
        println!(
            "Streaks: best {} / worst {} / current {}",
            result.streaks.best_streak, result.streaks.worst_streak, result.streaks.current_streak
        );
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Timeframe;
    use crate::core::staking::StakingPolicy;

    fn record(day: u32, odds: f64, prob: f64, won: bool) -> ScoredMatchRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        ScoredMatchRecord::new("Home", "Away", date, odds, prob, "H").with_actual_outcome(if won { "H" } else { "A" })
    }

    fn engine(staking: StakingPolicy) -> SimulationEngine {
        SimulationEngine::new(SimulationParameters {
            starting_bankroll: 1000.0,
            staking,
            ev_threshold: 0.0,
            min_odds: 1.01,
            max_odds: 100.0,
            timeframe: Timeframe::All,
            categories: None,
        })
        .unwrap()
    }

    fn mixed_feed() -> Vec<ScoredMatchRecord> {
        vec![
            record(1, 2.0, 0.6, true),
            record(2, 2.5, 0.5, false),
            record(3, 3.0, 0.4, true),
            record(4, 1.8, 0.7, false),
            record(5, 2.2, 0.55, false),
            record(6, 4.0, 0.3, true),
        ]
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let params = SimulationParameters {
            starting_bankroll: -1.0,
            ..Default::default()
        };
        assert!(SimulationEngine::new(params).is_err());
    }

    #[test]
    fn test_fixed_stake_run() {
        let feed = mixed_feed();
        let result = engine(StakingPolicy::Fixed { stake: 100.0 }).simulate(&feed);

        // +100, -100, +200, -100, -100, +300
        assert_eq!(result.total_bets, 6);
        assert_eq!(result.won_bets, 3);
        assert_eq!(result.lost_bets, 3);
        assert!((result.final_bankroll - 1300.0).abs() < 1e-9);
        assert!((result.metrics.roi - 30.0).abs() < 1e-9);
        assert!((result.metrics.win_rate - 50.0).abs() < 1e-9);
        assert!((result.metrics.profit_factor - 2.0).abs() < 1e-9);
        assert_eq!(result.timeline.len(), 6);
        assert_eq!(result.streaks.current_streak, "W1");
        assert_eq!(result.streaks.worst_streak, "L2");
    }

    #[test]
    fn test_final_bankroll_is_start_plus_profits() {
        let feed = mixed_feed();
        for staking in [
            StakingPolicy::Fixed { stake: 75.0 },
            StakingPolicy::Percentage { percent: 7.5 },
            StakingPolicy::Kelly { fraction: 0.5 },
        ] {
            let result = engine(staking).simulate(&feed);
            let profit: f64 = result.bets.iter().map(|b| b.profit).sum();
            assert!((result.final_bankroll - (1000.0 + profit)).abs() < 1e-9);
            assert!(result.won_bets + result.lost_bets <= feed.len());
            assert!((0.0..=100.0).contains(&result.metrics.win_rate));
            assert!(result.metrics.max_drawdown >= 0.0);
            let gain = result.final_bankroll - 1000.0;
            assert!(result.metrics.roi * gain >= 0.0);
            assert_eq!(result.metrics.roi == 0.0, gain == 0.0);
        }
    }

    #[test]
    fn test_drawdown_zero_when_bankroll_never_falls() {
        let feed: Vec<_> = (1..=5).map(|d| record(d, 2.0, 0.6, true)).collect();
        let result = engine(StakingPolicy::Percentage { percent: 10.0 }).simulate(&feed);
        assert_eq!(result.metrics.max_drawdown, 0.0);
        assert_eq!(result.streaks.best_streak, "W5");
    }

    #[test]
    fn test_drawdown_measured_from_peak() {
        let feed = vec![record(1, 2.0, 0.6, true), record(2, 2.0, 0.6, false), record(3, 2.0, 0.6, false)];
        let result = engine(StakingPolicy::Fixed { stake: 100.0 }).simulate(&feed);
        // Peak 1100 -> 900
        assert!((result.metrics.max_drawdown - 200.0 / 1100.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_kelly_fraction_places_nothing() {
        let feed = mixed_feed();
        let result = engine(StakingPolicy::Kelly { fraction: 0.0 }).simulate(&feed);
        assert_eq!(result.total_bets, 0);
        assert_eq!(result.skipped_records, feed.len());
        assert_eq!(result.final_bankroll, 1000.0);
        assert!(result.timeline.is_empty());
    }

    #[test]
    fn test_negative_kelly_skipped() {
        // f* < 0 when p * odds < 1
        let feed = vec![record(1, 2.0, 0.3, true)];
        let result = engine(StakingPolicy::Kelly { fraction: 1.0 }).simulate(&feed);
        assert_eq!(result.total_bets, 0);
        assert_eq!(result.skipped_records, 1);
    }

    #[test]
    fn test_fixed_stake_stops_when_bankroll_short() {
        let mut feed: Vec<_> = (1..=4).map(|d| record(d, 2.0, 0.6, false)).collect();
        feed.extend((5..=8).map(|d| record(d, 2.0, 0.6, true)));
        let result = engine(StakingPolicy::Fixed { stake: 300.0 }).simulate(&feed);

        // 1000 -> 700 -> 400 -> 100, then 300 > 100 for every later record
        assert_eq!(result.total_bets, 3);
        assert_eq!(result.skipped_records, 5);
        assert!((result.final_bankroll - 100.0).abs() < 1e-9);
        assert!(result.timeline.iter().skip(2).all(|p| (p.bankroll - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_unsettled_and_undated_records_skipped() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let unsettled = ScoredMatchRecord::new("Home", "Away", date, 2.0, 0.6, "H");
        let mut undated = record(2, 2.0, 0.6, true);
        undated.date = None;

        let result = engine(StakingPolicy::Fixed { stake: 10.0 }).simulate(&[unsettled, undated]);
        assert_eq!(result.total_bets, 0);
        assert_eq!(result.skipped_records, 2);
    }

    #[test]
    fn test_run_filters_and_orders_by_date() {
        let feed = vec![
            record(9, 2.0, 0.6, true),
            record(3, 2.0, 0.6, false),
            record(5, 1.2, 0.95, true), // below min odds
            record(7, 2.0, 0.4, true),  // negative EV
        ];
        let engine = SimulationEngine::new(SimulationParameters {
            staking: StakingPolicy::Fixed { stake: 50.0 },
            timeframe: Timeframe::All,
            ..Default::default()
        })
        .unwrap();

        let result = engine.run(&feed);
        assert_eq!(result.total_bets, 2);
        let dates: Vec<_> = result.timeline.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-03", "2024-01-09"]);
        assert!((result.final_bankroll - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_window_ignores_upcoming_fixtures() {
        let played = mixed_feed();
        let mut with_fixture = played.clone();
        let upcoming = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        with_fixture.push(ScoredMatchRecord::new("Next", "Up", upcoming, 2.0, 0.6, "H"));

        let engine = SimulationEngine::new(SimulationParameters {
            starting_bankroll: 1000.0,
            staking: StakingPolicy::Fixed { stake: 50.0 },
            ev_threshold: 0.0,
            min_odds: 1.01,
            max_odds: 100.0,
            timeframe: Timeframe::Month,
            categories: None,
        })
        .unwrap();

        let baseline = engine.run(&played);
        assert_eq!(baseline.total_bets, 6);
        assert_eq!(engine.run(&with_fixture), baseline);
    }

    #[test]
    fn test_run_on_empty_feed() {
        let result = engine(StakingPolicy::Fixed { stake: 50.0 }).run(&[]);
        assert_eq!(result, SimulationResult::new(1000.0));
        let response = result.to_response();
        assert_eq!(response.roi, 0.0);
        assert!(response.daily_data.is_empty());
        assert!(response.monthly_returns.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let feed = mixed_feed();
        let engine = engine(StakingPolicy::Kelly { fraction: 0.25 });
        assert_eq!(engine.simulate(&feed), engine.simulate(&feed));
    }

    #[test]
    fn test_response_shape() {
        let feed = mixed_feed();
        let response = engine(StakingPolicy::Percentage { percent: 3.333 }).simulate(&feed).to_response();
        assert_eq!(response.daily_data.len(), 6);
        assert_eq!(response.daily_data[0].day, 1);
        assert_eq!(response.monthly_returns.len(), 1);
        for point in &response.daily_data {
            assert_eq!(point.bankroll, round2(point.bankroll));
        }

        let json = serde_json::to_value(&response).unwrap();
        for field in [
            "startingBankroll",
            "finalBankroll",
            "totalBets",
            "wonBets",
            "lostBets",
            "winRate",
            "roi",
            "maxDrawdown",
            "profitFactor",
            "dailyData",
            "monthlyReturns",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }

    #[test]
    fn test_simulated_bet_serialization() {
        let feed = mixed_feed();
        let result = engine(StakingPolicy::Fixed { stake: 100.0 }).simulate(&feed);
        let json = serde_json::to_string(&result.bets[0]).unwrap();
        let deserialized: SimulatedBet = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, result.bets[0]);
    }
}
