//! Staking Policies
//!
//! Pure functions from (bankroll, record) to a stake. The policy never clamps
//! its output: a stake that is zero, negative, non-finite or larger than the
//! bankroll is returned as-is and the simulator decides to skip it.

use super::kelly::calculate_kelly_fraction;
use crate::error::{validate_fixed_stake, validate_kelly_fraction, validate_percent, ValidationError};
use crate::models::ScoredMatchRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stake sizing rule for a simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StakingPolicy {
    /// Same stake on every bet
    Fixed { stake: f64 },
    /// Percentage of the current bankroll, `percent` in `[0, 100]`
    Percentage { percent: f64 },
    /// Fractional Kelly, `fraction` in `[0, 1]`
    Kelly { fraction: f64 },
}

impl StakingPolicy {
    /// Stake for the next bet
    ///
    /// Returns `None` only when Kelly sizing is undefined for the record
    /// (decimal odds of 1 or below).
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use valuebet::core::staking::StakingPolicy;
    /// use valuebet::models::ScoredMatchRecord;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    /// let record = ScoredMatchRecord::new("Arsenal", "Chelsea", date, 5.0, 0.25, "H");
    /// let stake = StakingPolicy::Kelly { fraction: 0.5 }.stake(1000.0, &record).unwrap();
    /// assert!((stake - 31.25).abs() < 1e-9);
    /// ```
    pub fn stake(&self, bankroll: f64, record: &ScoredMatchRecord) -> Option<f64> {
        match *self {
            StakingPolicy::Fixed { stake } => Some(stake),
            StakingPolicy::Percentage { percent } => Some(bankroll * percent / 100.0),
            StakingPolicy::Kelly { fraction } => {
                calculate_kelly_fraction(record.predicted_prob, record.odds)
                    .map(|full_kelly| full_kelly * fraction * bankroll)
            }
        }
    }

    /// Check the policy parameter is in range
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            StakingPolicy::Fixed { stake } => validate_fixed_stake(stake),
            StakingPolicy::Percentage { percent } => validate_percent(percent),
            StakingPolicy::Kelly { fraction } => validate_kelly_fraction(fraction),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StakingPolicy::Fixed { .. } => "fixed",
            StakingPolicy::Percentage { .. } => "percentage",
            StakingPolicy::Kelly { .. } => "kelly",
        }
    }
}

impl Default for StakingPolicy {
    fn default() -> Self {
        StakingPolicy::Fixed { stake: 50.0 }
    }
}

impl fmt::Display for StakingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakingPolicy::Fixed { stake } => write!(f, "fixed ({:.2} per bet)", stake),
            StakingPolicy::Percentage { percent } => write!(f, "percentage ({}% of bankroll)", percent),
            StakingPolicy::Kelly { fraction } => write!(f, "kelly (x{})", fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(odds: f64, prob: f64) -> ScoredMatchRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        ScoredMatchRecord::new("Home", "Away", date, odds, prob, "H")
    }

    #[test]
    fn test_fixed_stake_ignores_bankroll() {
        let policy = StakingPolicy::Fixed { stake: 50.0 };
        assert_eq!(policy.stake(1000.0, &record(2.0, 0.6)), Some(50.0));
        assert_eq!(policy.stake(10.0, &record(2.0, 0.6)), Some(50.0));
    }

    #[test]
    fn test_percentage_stake() {
        let policy = StakingPolicy::Percentage { percent: 5.0 };
        let stake = policy.stake(1000.0, &record(2.0, 0.6)).unwrap();
        assert!((stake - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_kelly_stake() {
        // f* = (1.0 * 0.6 - 0.4) / 1.0 = 0.2
        let policy = StakingPolicy::Kelly { fraction: 0.5 };
        let stake = policy.stake(1000.0, &record(2.0, 0.6)).unwrap();
        assert!((stake - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_kelly_negative_edge_not_clamped() {
        let policy = StakingPolicy::Kelly { fraction: 1.0 };
        let stake = policy.stake(1000.0, &record(2.0, 0.3)).unwrap();
        assert!(stake < 0.0);
    }

    #[test]
    fn test_kelly_undefined_at_even_odds() {
        let policy = StakingPolicy::Kelly { fraction: 0.5 };
        assert_eq!(policy.stake(1000.0, &record(1.0, 0.9)), None);
    }

    #[test]
    fn test_zero_kelly_fraction_stakes_nothing() {
        let policy = StakingPolicy::Kelly { fraction: 0.0 };
        assert_eq!(policy.stake(1000.0, &record(3.0, 0.5)), Some(0.0));
    }

    #[test]
    fn test_validate() {
        assert!(StakingPolicy::Fixed { stake: 50.0 }.validate().is_ok());
        assert!(StakingPolicy::Fixed { stake: -1.0 }.validate().is_err());
        assert!(StakingPolicy::Percentage { percent: 101.0 }.validate().is_err());
        assert!(StakingPolicy::Kelly { fraction: 0.0 }.validate().is_ok());
        assert!(StakingPolicy::Kelly { fraction: 1.2 }.validate().is_err());
    }

    #[test]
    fn test_serde_tagged() {
        let policy: StakingPolicy = serde_json::from_str(r#"{"type":"kelly","fraction":0.25}"#).unwrap();
        assert_eq!(policy, StakingPolicy::Kelly { fraction: 0.25 });
        assert_eq!(policy.name(), "kelly");
    }
}
