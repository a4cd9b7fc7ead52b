//! Valuebet - Value-bet strategy backtesting and performance analytics
//!
//! This library provides:
//! - Filtering of model-scored matches and ledger bets by time window and
//!   threshold criteria
//! - Fixed, percentage and fractional-Kelly staking
//! - A deterministic backtest simulator with ROI, drawdown, profit factor and
//!   monthly returns
//! - Live analytics over a settled bet ledger: streaks, category breakdown,
//!   daily profit and model accuracy
//! - Loaders for the scored-match CSV feed and the JSON bet ledger
//!
//! # Example
//!
//! ```no_run
//! use valuebet::backtesting::SimulationEngine;
//! use valuebet::data::load_scored_feed;
//! use valuebet::models::SimulationParameters;
//!
//! let records = load_scored_feed("data/ValueBets_Deployable.csv", None).unwrap();
//! let engine = SimulationEngine::new(SimulationParameters::default()).unwrap();
//! let result = engine.run(&records);
//! println!("ROI: {:.2}%", result.to_response().roi);
//! ```

pub mod analytics;
pub mod backtesting;
pub mod core;
pub mod data;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use analytics::{AnalyticsOptions, AnalyticsReport, LiveAnalyticsAggregator, StreakSummary};
pub use backtesting::{SimulationEngine, SimulationResult};
pub use crate::core::{MatchId, RecordFilter, StakingPolicy, Timeframe};
pub use error::ValidationError;
pub use models::{
    AnalyticsRequest, BetRecord, BetStatus, LedgerError, ScoredMatchRecord, SimulationParameters,
    SimulationRequest, SimulationResponse, TimelinePoint,
};
