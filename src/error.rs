//! Validation errors for simulation and analytics requests
//!
//! Caller contract violations are the only errors that abort a computation.
//! Noisy feed data never surfaces here: malformed records are dropped by the
//! record filter and degenerate stakes are skipped by the simulator.

use thiserror::Error;

/// Lowest decimal odds a simulation may be configured with
pub const MIN_ALLOWED_ODDS: f64 = 1.01;

/// Request validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("starting bankroll must be positive, got {0}")]
    NonPositiveBankroll(f64),

    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("minimum odds must be at least {MIN_ALLOWED_ODDS}, got {0}")]
    MinOddsTooLow(f64),

    #[error("minimum odds {min_odds} exceed maximum odds {max_odds}")]
    InvertedOddsRange { min_odds: f64, max_odds: f64 },

    #[error("kelly fraction must be between 0 and 1, got {0}")]
    KellyFractionOutOfRange(f64),

    #[error("percentage per bet must be between 0 and 100, got {0}")]
    PercentOutOfRange(f64),

    #[error("fixed stake must not be negative, got {0}")]
    NegativeFixedStake(f64),

    #[error("stake type '{stake_type}' requires '{field}'")]
    MissingStakeParameter {
        stake_type: &'static str,
        field: &'static str,
    },

    #[error("unknown stake type '{0}', expected fixed, percentage or kelly")]
    UnknownStakeType(String),

    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),
}

/// Validation functions
pub fn validate_finite(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { name, value });
    }
    Ok(())
}

pub fn validate_bankroll(bankroll: f64) -> Result<(), ValidationError> {
    validate_finite("bankroll", bankroll)?;
    if bankroll <= 0.0 {
        return Err(ValidationError::NonPositiveBankroll(bankroll));
    }
    Ok(())
}

pub fn validate_odds_range(min_odds: f64, max_odds: f64) -> Result<(), ValidationError> {
    validate_finite("min_odds", min_odds)?;
    // max_odds may be +inf to mean "no upper bound"
    if max_odds.is_nan() {
        return Err(ValidationError::NonFinite {
            name: "max_odds",
            value: max_odds,
        });
    }
    if min_odds < MIN_ALLOWED_ODDS {
        return Err(ValidationError::MinOddsTooLow(min_odds));
    }
    if min_odds > max_odds {
        return Err(ValidationError::InvertedOddsRange { min_odds, max_odds });
    }
    Ok(())
}

pub fn validate_kelly_fraction(fraction: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(ValidationError::KellyFractionOutOfRange(fraction));
    }
    Ok(())
}

pub fn validate_percent(percent: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ValidationError::PercentOutOfRange(percent));
    }
    Ok(())
}

pub fn validate_fixed_stake(stake: f64) -> Result<(), ValidationError> {
    validate_finite("fixed_stake", stake)?;
    if stake < 0.0 {
        return Err(ValidationError::NegativeFixedStake(stake));
    }
    Ok(())
}
