//! Backtesting engine for validating betting strategies

pub mod metrics;
pub mod simulator;

pub use metrics::{analyze_by_category, analyze_by_odds_band, DimensionAnalysis, PerformanceMetrics};
pub use simulator::{SimulatedBet, SimulationEngine, SimulationResult};
