//! Performance analytics over settled bets

pub mod live;
pub mod streaks;

pub use live::{bankroll_growth, AnalyticsOptions, AnalyticsReport, LiveAnalyticsAggregator};
pub use streaks::{SettledOutcome, StreakAnalyzer, StreakSummary};
