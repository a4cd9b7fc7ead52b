//! Streak Analysis
//!
//! Longest win and loss runs, the run in progress, and the largest single
//! win and loss. One forward pass with constant state.

use serde::{Deserialize, Serialize};

/// Settled outcome of one bet, in chronological order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettledOutcome {
    pub won: bool,
    pub profit: f64,
}

/// Streak summary
///
/// Runs are rendered as `W<n>` or `L<n>`. An empty input gives `W0` best,
/// `L0` worst and `W0` current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub best_streak: String,
    pub worst_streak: String,
    pub current_streak: String,
    /// Largest single winning profit, 0 without wins
    pub max_win: f64,
    /// Largest single loss as a signed profit, 0 without losses
    pub max_loss: f64,
}

impl Default for StreakSummary {
    fn default() -> Self {
        StreakAnalyzer::new().finish()
    }
}

/// Incremental streak tracker
#[derive(Debug, Clone, Default)]
pub struct StreakAnalyzer {
    current: i64, // Positive for wins, negative for losses
    longest_win: u64,
    longest_loss: u64,
    max_win: f64,
    max_loss: f64,
}

impl StreakAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise a chronologically ordered sequence of outcomes
    ///
    /// # Examples
    /// ```
    /// use valuebet::analytics::streaks::{SettledOutcome, StreakAnalyzer};
    ///
    /// let outcomes = [true, true, false].map(|won| SettledOutcome { won, profit: if won { 1.0 } else { -1.0 } });
    /// let summary = StreakAnalyzer::analyze(outcomes);
    /// assert_eq!(summary.best_streak, "W2");
    /// assert_eq!(summary.current_streak, "L1");
    /// ```
    pub fn analyze<I>(outcomes: I) -> StreakSummary
    where
        I: IntoIterator<Item = SettledOutcome>,
    {
        let mut analyzer = Self::new();
        for outcome in outcomes {
            analyzer.push(outcome);
        }
        analyzer.finish()
    }

    pub fn push(&mut self, outcome: SettledOutcome) {
        if outcome.won {
            self.current = if self.current > 0 { self.current + 1 } else { 1 };
            self.longest_win = self.longest_win.max(self.current.unsigned_abs());
            if outcome.profit.is_finite() {
                self.max_win = self.max_win.max(outcome.profit);
            }
        } else {
            self.current = if self.current < 0 { self.current - 1 } else { -1 };
            self.longest_loss = self.longest_loss.max(self.current.unsigned_abs());
            if outcome.profit.is_finite() {
                self.max_loss = self.max_loss.min(outcome.profit);
            }
        }
    }

    pub fn finish(&self) -> StreakSummary {
        let current_streak = if self.current < 0 {
            format!("L{}", self.current.unsigned_abs())
        } else {
            format!("W{}", self.current)
        };

        StreakSummary {
            best_streak: format!("W{}", self.longest_win),
            worst_streak: format!("L{}", self.longest_loss),
            current_streak,
            max_win: self.max_win,
            max_loss: self.max_loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(pattern: &str) -> Vec<SettledOutcome> {
        pattern
            .chars()
            .map(|c| {
                let won = c == 'W';
                SettledOutcome {
                    won,
                    profit: if won { 10.0 } else { -10.0 },
                }
            })
            .collect()
    }

    #[test]
    fn test_mixed_sequence() {
        let summary = StreakAnalyzer::analyze(outcomes("WWLWWWLLLL"));
        assert_eq!(summary.best_streak, "W3");
        assert_eq!(summary.worst_streak, "L4");
        assert_eq!(summary.current_streak, "L4");
    }

    #[test]
    fn test_empty_sequence() {
        let summary = StreakAnalyzer::analyze(Vec::new());
        assert_eq!(summary.best_streak, "W0");
        assert_eq!(summary.worst_streak, "L0");
        assert_eq!(summary.current_streak, "W0");
        assert_eq!(summary.max_win, 0.0);
        assert_eq!(summary.max_loss, 0.0);
        assert_eq!(summary, StreakSummary::default());
    }

    #[test]
    fn test_all_wins() {
        let summary = StreakAnalyzer::analyze(outcomes("WWWWW"));
        assert_eq!(summary.best_streak, "W5");
        assert_eq!(summary.worst_streak, "L0");
        assert_eq!(summary.current_streak, "W5");
    }

    #[test]
    fn test_current_streak_is_last_run() {
        let summary = StreakAnalyzer::analyze(outcomes("LLLWW"));
        assert_eq!(summary.worst_streak, "L3");
        assert_eq!(summary.current_streak, "W2");
    }

    #[test]
    fn test_max_win_and_loss() {
        let seq = vec![
            SettledOutcome { won: true, profit: 15.0 },
            SettledOutcome { won: false, profit: -40.0 },
            SettledOutcome { won: true, profit: 85.5 },
            SettledOutcome { won: false, profit: -5.0 },
        ];
        let summary = StreakAnalyzer::analyze(seq);
        assert_eq!(summary.max_win, 85.5);
        assert_eq!(summary.max_loss, -40.0);
    }
}
