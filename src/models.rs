use crate::core::filter::{FilterableRecord, RecordFilter, Timeframe};
use crate::core::identity::MatchId;
use crate::core::staking::StakingPolicy;
use crate::error::{validate_bankroll, validate_finite, validate_odds_range, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Category used when the feed carries none
pub const DEFAULT_CATEGORY: &str = "Football";

/// Read a value-bet flag from feed text
///
/// `True`, `TRUE`, `true` and `1` are true. Anything else, including empty
/// strings and `None`-like markers, is false.
pub fn parse_value_flag(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw == "1"
}

fn deserialize_value_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        Some(RawFlag::Bool(flag)) => flag,
        Some(RawFlag::Number(n)) => n != 0,
        Some(RawFlag::Text(text)) => parse_value_flag(&text),
        None => false,
    })
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Model-scored historical (or upcoming) match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatchRecord {
    pub match_id: MatchId,
    pub date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    pub category: String,
    pub odds: f64,
    pub predicted_prob: f64,
    pub expected_value: f64, // p * odds - 1
    pub is_value_bet: bool,
    pub predicted_outcome: String,
    /// `None` until the match has been played
    pub actual_outcome: Option<String>,
}

impl ScoredMatchRecord {
    /// Build a record, deriving the match ID, EV and value flag
    pub fn new(
        home_team: &str,
        away_team: &str,
        date: NaiveDate,
        odds: f64,
        predicted_prob: f64,
        predicted_outcome: &str,
    ) -> Self {
        let expected_value = predicted_prob * odds - 1.0;
        Self {
            match_id: MatchId::derive(home_team, away_team, &date.to_string()),
            date: Some(date),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            category: default_category(),
            odds,
            predicted_prob,
            expected_value,
            is_value_bet: expected_value > 0.0,
            predicted_outcome: predicted_outcome.to_string(),
            actual_outcome: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_actual_outcome(mut self, outcome: &str) -> Self {
        self.actual_outcome = Some(outcome.to_string());
        self
    }

    pub fn with_value_flag(mut self, is_value_bet: bool) -> Self {
        self.is_value_bet = is_value_bet;
        self
    }

    /// Win iff the predicted outcome matched the actual one
    pub fn is_win(&self) -> bool {
        self.actual_outcome.as_deref() == Some(self.predicted_outcome.as_str())
    }

    /// Profit of a one-unit stake: `odds - 1` on a correct pick, `-1` otherwise
    ///
    /// `None` while the match is unplayed.
    pub fn unit_profit(&self) -> Option<f64> {
        self.actual_outcome.as_ref()?;
        Some(if self.is_win() { self.odds - 1.0 } else { -1.0 })
    }
}

impl FilterableRecord for ScoredMatchRecord {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
    }

    fn odds(&self) -> f64 {
        self.odds
    }

    fn expected_value(&self) -> f64 {
        self.expected_value
    }

    fn is_value_bet(&self) -> bool {
        self.is_value_bet
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_settled(&self) -> bool {
        self.actual_outcome.is_some()
    }

    fn is_well_formed(&self) -> bool {
        self.odds.is_finite()
            && self.expected_value.is_finite()
            && self.predicted_prob.is_finite()
            && self.date.is_some()
    }
}

/// Bet status in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    #[default]
    Pending,
    Won,
    Lost,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => f.write_str("pending"),
            BetStatus::Won => f.write_str("won"),
            BetStatus::Lost => f.write_str("lost"),
        }
    }
}

/// Ledger errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("bet on {match_id} is already settled as {status}")]
    AlreadySettled { match_id: MatchId, status: BetStatus },
}

/// Placed bet in a user's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    #[serde(default)]
    pub user_id: String,
    pub match_id: MatchId,
    pub stake: f64,
    pub odds: f64,
    #[serde(default, alias = "ev")]
    pub expected_value: f64,
    #[serde(default = "default_category", alias = "sport")]
    pub category: String,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub status: BetStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub payout: f64,
    #[serde(default, alias = "isValueBet", deserialize_with = "deserialize_value_flag")]
    pub is_value_bet: bool,
    #[serde(default, alias = "isDeleted")]
    pub is_deleted: bool,
}

impl BetRecord {
    /// New pending bet
    pub fn place(user_id: &str, match_id: MatchId, stake: f64, odds: f64, placed_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            match_id,
            stake,
            odds,
            expected_value: 0.0,
            category: default_category(),
            placed_at,
            status: BetStatus::Pending,
            result: None,
            profit: 0.0,
            payout: 0.0,
            is_value_bet: false,
            is_deleted: false,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_expected_value(mut self, expected_value: f64, is_value_bet: bool) -> Self {
        self.expected_value = expected_value;
        self.is_value_bet = is_value_bet;
        self
    }

    /// Resolve a pending bet
    ///
    /// A win pays `odds * stake` for a profit of `odds * stake - stake`; a
    /// loss pays nothing for a profit of `-stake`. Settling twice fails.
    pub fn settle(&mut self, won: bool, result: &str) -> Result<(), LedgerError> {
        if self.status != BetStatus::Pending {
            return Err(LedgerError::AlreadySettled {
                match_id: self.match_id.clone(),
                status: self.status,
            });
        }

        if won {
            self.status = BetStatus::Won;
            self.payout = self.odds * self.stake;
            self.profit = self.payout - self.stake;
        } else {
            self.status = BetStatus::Lost;
            self.payout = 0.0;
            self.profit = -self.stake;
        }
        self.result = Some(result.to_string());
        Ok(())
    }

    pub fn is_won(&self) -> bool {
        self.status == BetStatus::Won
    }
}

impl FilterableRecord for BetRecord {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.placed_at)
    }

    fn odds(&self) -> f64 {
        self.odds
    }

    fn expected_value(&self) -> f64 {
        self.expected_value
    }

    fn is_value_bet(&self) -> bool {
        self.is_value_bet
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn is_settled(&self) -> bool {
        self.status != BetStatus::Pending
    }

    fn is_active(&self) -> bool {
        !self.is_deleted
    }

    fn is_well_formed(&self) -> bool {
        self.odds.is_finite() && self.expected_value.is_finite() && self.stake.is_finite() && self.profit.is_finite()
    }
}

/// Validated backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub starting_bankroll: f64,
    pub staking: StakingPolicy,
    pub ev_threshold: f64,
    pub min_odds: f64,
    pub max_odds: f64,
    pub timeframe: Timeframe,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            starting_bankroll: 1000.0,
            staking: StakingPolicy::Fixed { stake: 50.0 },
            ev_threshold: 0.02,
            min_odds: 1.5,
            max_odds: 5.0,
            timeframe: Timeframe::Quarter,
            categories: None,
        }
    }
}

impl SimulationParameters {
    /// Fail fast on contract violations before any record is touched
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_bankroll(self.starting_bankroll)?;
        validate_odds_range(self.min_odds, self.max_odds)?;
        validate_finite("ev_threshold", self.ev_threshold)?;
        self.staking.validate()
    }

    /// Record filter matching these parameters
    pub fn record_filter(&self) -> RecordFilter {
        RecordFilter::backtest(self.min_odds, self.max_odds, self.ev_threshold, self.timeframe)
            .with_categories(self.categories.clone())
    }
}

fn default_timeframe() -> String {
    "all".to_string()
}

/// Simulation request as posted by the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub bankroll: f64,
    pub stake_type: String,
    #[serde(default)]
    pub fixed_stake: Option<f64>,
    #[serde(default)]
    pub percent: Option<f64>,
    /// Either a fraction in `[0, 1]` or a percentage in `(1, 100]`
    #[serde(default)]
    pub kelly_fraction: Option<f64>,
    #[serde(default)]
    pub ev_threshold: f64,
    pub min_odds: f64,
    pub max_odds: f64,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub sports: Option<Vec<String>>,
}

impl TryFrom<SimulationRequest> for SimulationParameters {
    type Error = ValidationError;

    fn try_from(req: SimulationRequest) -> Result<Self, Self::Error> {
        let staking = match req.stake_type.trim().to_ascii_lowercase().as_str() {
            "fixed" => StakingPolicy::Fixed {
                stake: req.fixed_stake.ok_or(ValidationError::MissingStakeParameter {
                    stake_type: "fixed",
                    field: "fixed_stake",
                })?,
            },
            "percentage" | "percent" => StakingPolicy::Percentage {
                percent: req.percent.ok_or(ValidationError::MissingStakeParameter {
                    stake_type: "percentage",
                    field: "percent",
                })?,
            },
            "kelly" => {
                let raw = req.kelly_fraction.ok_or(ValidationError::MissingStakeParameter {
                    stake_type: "kelly",
                    field: "kelly_fraction",
                })?;
                // The dashboard form posts 1-100
                let fraction = if raw > 1.0 && raw <= 100.0 { raw / 100.0 } else { raw };
                StakingPolicy::Kelly { fraction }
            }
            other => return Err(ValidationError::UnknownStakeType(other.to_string())),
        };

        let params = SimulationParameters {
            starting_bankroll: req.bankroll,
            staking,
            ev_threshold: req.ev_threshold,
            min_odds: req.min_odds,
            max_odds: req.max_odds,
            timeframe: req.timeframe.parse()?,
            categories: req.sports,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Bankroll after a bet (or at the start of a growth curve)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub bankroll: f64,
}

/// Day-indexed bankroll point in a simulation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: usize, // 1-based
    pub date: NaiveDate,
    pub bankroll: f64,
}

/// Simulation response, rounded to 2 decimal places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub starting_bankroll: f64,
    pub final_bankroll: f64,
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    pub win_rate: f64,
    pub roi: f64,
    pub max_drawdown: f64,
    pub profit_factor: f64,
    pub daily_data: Vec<DailyPoint>,
    pub monthly_returns: Vec<f64>,
}

/// Live analytics request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub user_id: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}
