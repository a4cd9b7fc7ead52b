//! Kelly Criterion
//!
//! Growth-optimal stake fraction for a single binary wager.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     b = odds - 1 (net odds)
//!     p = model probability of winning
//!     q = 1 - p (probability of losing)
//!
//! Fractional Kelly scales `f*` by a damping factor in `[0, 1]` to trade some
//! growth for lower variance.

use serde::{Deserialize, Serialize};

/// Full Kelly fraction for a single bet
///
/// Returns `None` when the formula is undefined: net odds `b <= 0` or any
/// non-finite input. A negative result means the bet has negative edge.
///
/// # Examples
/// ```
/// use valuebet::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.25, 5.0).unwrap(); // EV = +0.25
/// assert!((kelly - 0.0625).abs() < 1e-12);
/// assert!(calculate_kelly_fraction(0.9, 1.0).is_none());
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> Option<f64> {
    if !probability.is_finite() || !odds.is_finite() {
        return None;
    }

    let b = odds - 1.0;
    if b <= 0.0 {
        return None;
    }

    let q = 1.0 - probability;
    Some((b * probability - q) / b)
}

/// Kelly sizing summary for display next to a scored match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellySizing {
    pub probability: f64,
    pub odds: f64,
    pub expected_value: f64,
    pub kelly_fraction: f64,       // Full Kelly
    pub recommended_fraction: f64, // After damping, floored at 0
}

impl KellySizing {
    /// Size a bet with the given damping multiplier
    ///
    /// Returns `None` where [`calculate_kelly_fraction`] is undefined.
    pub fn new(probability: f64, odds: f64, multiplier: f64) -> Option<Self> {
        let kelly = calculate_kelly_fraction(probability, odds)?;

        Some(Self {
            probability,
            odds,
            expected_value: probability * odds - 1.0,
            kelly_fraction: kelly,
            recommended_fraction: (kelly * multiplier).max(0.0),
        })
    }

    /// Stake for a bankroll at the recommended fraction
    pub fn stake_for(&self, bankroll: f64) -> f64 {
        bankroll * self.recommended_fraction
    }
}
