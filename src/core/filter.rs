//! Record Filter
//!
//! Selects scored matches or ledger bets by time window and threshold
//! criteria. One implementation serves both the backtest (window anchored at
//! the latest record) and live analytics (window anchored at wall-clock time).
//!
//! Malformed records (non-finite odds or EV, missing date) are dropped rather
//! than reported. Soft-deleted ledger entries never pass. Output preserves
//! input order and the input slice is never touched.

use crate::error::ValidationError;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "week", alias = "1week", alias = "7days")]
    Week,
    #[serde(rename = "month", alias = "1month")]
    Month,
    #[serde(rename = "quarter", alias = "3months")]
    Quarter,
    #[serde(rename = "6months", alias = "halfyear")]
    HalfYear,
    #[serde(rename = "year", alias = "1year", alias = "12months")]
    Year,
}

impl Timeframe {
    /// Start of the window ending at `anchor`, `None` for [`Timeframe::All`]
    ///
    /// Months are calendar months: a one-month window anchored on 31 March
    /// starts on 29 February in a leap year.
    pub fn cutoff(self, anchor: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Timeframe::All => None,
            Timeframe::Week => anchor.checked_sub_signed(Duration::days(7)),
            Timeframe::Month => anchor.checked_sub_months(Months::new(1)),
            Timeframe::Quarter => anchor.checked_sub_months(Months::new(3)),
            Timeframe::HalfYear => anchor.checked_sub_months(Months::new(6)),
            Timeframe::Year => anchor.checked_sub_months(Months::new(12)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::All => "all",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Quarter => "quarter",
            Timeframe::HalfYear => "6months",
            Timeframe::Year => "year",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Timeframe::All),
            "week" | "1week" | "7days" => Ok(Timeframe::Week),
            "month" | "1month" => Ok(Timeframe::Month),
            "quarter" | "3months" => Ok(Timeframe::Quarter),
            "6months" | "halfyear" => Ok(Timeframe::HalfYear),
            "year" | "1year" | "12months" => Ok(Timeframe::Year),
            _ => Err(ValidationError::UnknownTimeframe(s.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What "now" means for the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAnchor {
    /// Fixed instant, normally wall-clock time for live analytics
    At(DateTime<Utc>),
    /// Latest timestamp among the well-formed input records (backtests)
    LatestRecord,
}

/// Fields the filter needs from a record
pub trait FilterableRecord {
    fn timestamp(&self) -> Option<DateTime<Utc>>;
    fn odds(&self) -> f64;
    fn expected_value(&self) -> f64;
    fn is_value_bet(&self) -> bool;
    fn category(&self) -> &str;
    fn is_settled(&self) -> bool;

    /// Soft-deleted records report `false`
    fn is_active(&self) -> bool {
        true
    }

    fn is_well_formed(&self) -> bool {
        self.odds().is_finite() && self.expected_value().is_finite() && self.timestamp().is_some()
    }
}

/// Filter criteria
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    pub timeframe: Timeframe,
    pub anchor: WindowAnchor,
    pub min_odds: Option<f64>,
    pub max_odds: Option<f64>,
    pub ev_threshold: Option<f64>,
    pub value_bets_only: bool,
    pub settled_only: bool,
    /// Exact category names to keep, `None` keeps every category
    pub categories: Option<Vec<String>>,
}

impl RecordFilter {
    /// Time window only
    pub fn window(timeframe: Timeframe, anchor: WindowAnchor) -> Self {
        Self {
            timeframe,
            anchor,
            min_odds: None,
            max_odds: None,
            ev_threshold: None,
            value_bets_only: false,
            settled_only: false,
            categories: None,
        }
    }

    /// Backtest criteria: settled value bets within the odds range and above
    /// the EV threshold, windowed back from the latest record
    pub fn backtest(min_odds: f64, max_odds: f64, ev_threshold: f64, timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            anchor: WindowAnchor::LatestRecord,
            min_odds: Some(min_odds),
            max_odds: Some(max_odds),
            ev_threshold: Some(ev_threshold),
            value_bets_only: true,
            settled_only: true,
            categories: None,
        }
    }

    pub fn with_categories(mut self, categories: Option<Vec<String>>) -> Self {
        self.categories = categories.filter(|c| !c.is_empty());
        self
    }

    pub fn with_value_bets_only(mut self, value_bets_only: bool) -> Self {
        self.value_bets_only = value_bets_only;
        self
    }

    pub fn with_settled_only(mut self, settled_only: bool) -> Self {
        self.settled_only = settled_only;
        self
    }

    /// Keep the records that pass, in input order
    pub fn apply<'a, R: FilterableRecord>(&self, records: &'a [R]) -> Vec<&'a R> {
        let cutoff = self.resolve_cutoff(records);
        records.iter().filter(|r| self.matches(*r, cutoff)).collect()
    }

    /// Window start for this input, `None` when the window is unbounded
    ///
    /// With `settled_only` the latest-record anchor only considers settled
    /// records, so upcoming fixtures never move the window.
    pub fn resolve_cutoff<R: FilterableRecord>(&self, records: &[R]) -> Option<DateTime<Utc>> {
        let anchor = match self.anchor {
            WindowAnchor::At(now) => now,
            WindowAnchor::LatestRecord => records
                .iter()
                .filter(|r| r.is_well_formed())
                .filter(|r| !self.settled_only || r.is_settled())
                .filter_map(|r| r.timestamp())
                .max()?,
        };
        self.timeframe.cutoff(anchor)
    }

    /// Single-record check against a resolved cutoff
    pub fn matches<R: FilterableRecord>(&self, record: &R, cutoff: Option<DateTime<Utc>>) -> bool {
        if !record.is_well_formed() || !record.is_active() {
            return false;
        }

        if let (Some(cutoff), Some(ts)) = (cutoff, record.timestamp()) {
            if ts <= cutoff {
                return false;
            }
        }

        let odds = record.odds();
        if self.min_odds.is_some_and(|min| odds < min) || self.max_odds.is_some_and(|max| odds > max) {
            return false;
        }
        if self.ev_threshold.is_some_and(|threshold| record.expected_value() < threshold) {
            return false;
        }
        if self.value_bets_only && !record.is_value_bet() {
            return false;
        }
        if self.settled_only && !record.is_settled() {
            return false;
        }

        match &self.categories {
            Some(categories) => categories.iter().any(|c| c == record.category()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::MatchId;
    use crate::models::{BetRecord, ScoredMatchRecord};
    use chrono::{NaiveDate, TimeZone};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scored(date: NaiveDate, odds: f64, prob: f64) -> ScoredMatchRecord {
        ScoredMatchRecord::new("Home", "Away", date, odds, prob, "H").with_actual_outcome("H")
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("3months".parse::<Timeframe>(), Ok(Timeframe::Quarter));
        assert_eq!("Quarter".parse::<Timeframe>(), Ok(Timeframe::Quarter));
        assert_eq!("1year".parse::<Timeframe>(), Ok(Timeframe::Year));
        assert_eq!("all".parse::<Timeframe>(), Ok(Timeframe::All));
        assert!(matches!(
            "fortnight".parse::<Timeframe>(),
            Err(ValidationError::UnknownTimeframe(_))
        ));
    }

    #[test]
    fn test_timeframe_serde_aliases() {
        let tf: Timeframe = serde_json::from_str("\"1month\"").unwrap();
        assert_eq!(tf, Timeframe::Month);
        assert_eq!(serde_json::to_string(&Timeframe::HalfYear).unwrap(), "\"6months\"");
    }

    #[test]
    fn test_calendar_month_cutoff() {
        let anchor = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let cutoff = Timeframe::Month.cutoff(anchor).unwrap();
        assert_eq!(cutoff.date_naive(), ymd(2024, 2, 29));
        assert_eq!(Timeframe::All.cutoff(anchor), None);
    }

    #[test]
    fn test_backtest_window_anchored_at_latest_record() {
        let records = vec![
            scored(ymd(2023, 12, 1), 2.0, 0.6),
            scored(ymd(2024, 2, 1), 2.0, 0.6),
            scored(ymd(2024, 3, 1), 2.0, 0.6),
        ];
        let filter = RecordFilter::backtest(1.5, 5.0, 0.0, Timeframe::Month);
        let kept = filter.apply(&records);
        // Cutoff is 2024-02-01 exactly, which is excluded
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_upcoming_fixture_does_not_move_backtest_window() {
        let played: Vec<ScoredMatchRecord> = (1..=10).map(|d| scored(ymd(2024, 3, d), 2.0, 0.6)).collect();
        let mut with_fixture = played.clone();
        with_fixture.push(ScoredMatchRecord::new("Next", "Up", ymd(2024, 5, 20), 2.0, 0.6, "H"));

        let filter = RecordFilter::backtest(1.5, 5.0, 0.0, Timeframe::Month);
        assert_eq!(filter.resolve_cutoff(&with_fixture), filter.resolve_cutoff(&played));
        assert_eq!(filter.apply(&with_fixture).len(), 10);
        assert_eq!(filter.apply(&played).len(), 10);
    }

    #[test]
    fn test_threshold_criteria() {
        let records = vec![
            scored(ymd(2024, 1, 1), 1.4, 0.9),  // odds too low
            scored(ymd(2024, 1, 2), 2.0, 0.6),  // ev 0.2
            scored(ymd(2024, 1, 3), 6.0, 0.3),  // odds too high
            scored(ymd(2024, 1, 4), 2.0, 0.51), // ev 0.02
            scored(ymd(2024, 1, 5), 2.0, 0.4),  // negative ev, not a value bet
        ];
        let filter = RecordFilter::backtest(1.5, 5.0, 0.05, Timeframe::All);
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, Some(ymd(2024, 1, 2)));
    }

    #[test]
    fn test_malformed_records_dropped() {
        let mut no_date = scored(ymd(2024, 1, 1), 2.0, 0.6);
        no_date.date = None;
        let mut nan_odds = scored(ymd(2024, 1, 2), 2.0, 0.6);
        nan_odds.odds = f64::NAN;
        let mut inf_ev = scored(ymd(2024, 1, 3), 2.0, 0.6);
        inf_ev.expected_value = f64::INFINITY;
        let good = scored(ymd(2024, 1, 4), 2.0, 0.6);

        let records = vec![no_date, nan_odds, inf_ev, good];
        let kept = RecordFilter::window(Timeframe::All, WindowAnchor::LatestRecord).apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, Some(ymd(2024, 1, 4)));
    }

    #[test]
    fn test_unsettled_excluded_from_backtest() {
        let pending = ScoredMatchRecord::new("Home", "Away", ymd(2024, 1, 1), 2.0, 0.6, "H");
        let records = vec![pending, scored(ymd(2024, 1, 2), 2.0, 0.6)];
        let filter = RecordFilter::backtest(1.5, 5.0, 0.0, Timeframe::All);
        assert_eq!(filter.apply(&records).len(), 1);
        assert_eq!(filter.clone().with_settled_only(false).apply(&records).len(), 2);
    }

    #[test]
    fn test_category_restriction() {
        let records = vec![
            scored(ymd(2024, 1, 1), 2.0, 0.6).with_category("Tennis"),
            scored(ymd(2024, 1, 2), 2.0, 0.6),
        ];
        let filter = RecordFilter::backtest(1.5, 5.0, 0.0, Timeframe::All)
            .with_categories(Some(vec!["Tennis".to_string()]));
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "Tennis");

        // Empty list means no restriction
        let open = RecordFilter::backtest(1.5, 5.0, 0.0, Timeframe::All).with_categories(Some(vec![]));
        assert_eq!(open.apply(&records).len(), 2);
    }

    #[test]
    fn test_filter_idempotent_and_order_preserving() {
        let records: Vec<_> = (1..=20)
            .map(|d| scored(ymd(2024, 1, d), 1.5 + d as f64 * 0.2, 0.5))
            .collect();
        let before: Vec<_> = records.iter().map(|r| r.odds).collect();
        let filter = RecordFilter::backtest(1.5, 4.0, 0.0, Timeframe::All);

        let once: Vec<ScoredMatchRecord> = filter.apply(&records).into_iter().cloned().collect();
        let twice: Vec<ScoredMatchRecord> = filter.apply(&once).into_iter().cloned().collect();

        assert_eq!(once, twice);
        assert!(once.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(records.iter().map(|r| r.odds).collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_live_window_on_ledger() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let recent = BetRecord::place("u1", MatchId::from_fixture(1), 10.0, 2.0, now - Duration::days(3));
        let old = BetRecord::place("u1", MatchId::from_fixture(2), 10.0, 2.0, now - Duration::days(10));
        let mut deleted = BetRecord::place("u1", MatchId::from_fixture(3), 10.0, 2.0, now - Duration::days(1));
        deleted.is_deleted = true;

        let bets = vec![recent, old, deleted];
        let kept = RecordFilter::window(Timeframe::Week, WindowAnchor::At(now)).apply(&bets);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].match_id, MatchId::from_fixture(1));
    }
}
