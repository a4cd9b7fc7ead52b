//! Scored-match feed loading
//!
//! Reads the model output CSV. Every column is read as text and converted
//! here, at the ingestion boundary: dates through the flexible date parser,
//! value flags to strict booleans, numbers to `f64` (NaN when unreadable so
//! the record filter drops the row).

use super::LoadError;
use crate::core::dates::{parse_date_with_hint, DateFormat};
use crate::core::identity::MatchId;
use crate::models::{parse_value_flag, ScoredMatchRecord, DEFAULT_CATEGORY};
use polars::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Column names in the feed
#[derive(Debug, Clone)]
pub struct FeedColumns {
    pub date: &'static str,
    pub home_team: &'static str,
    pub away_team: &'static str,
    pub category: &'static str,
    pub odds: &'static str,
    pub predicted_prob: &'static str,
    pub expected_value: &'static str,
    pub is_value_bet: &'static str,
    pub actual_outcome: &'static str,
    pub predicted_outcome: &'static str,
}

impl Default for FeedColumns {
    fn default() -> Self {
        Self {
            date: "Date",
            home_team: "HomeTeam",
            away_team: "AwayTeam",
            category: "Sport",
            odds: "chosen_odds",
            predicted_prob: "chosen_prob",
            expected_value: "Expected_Value",
            is_value_bet: "isValueBet",
            actual_outcome: "FTR",
            predicted_outcome: "FTR_pred",
        }
    }
}

impl FeedColumns {
    fn required(&self) -> [&'static str; 5] {
        [self.date, self.home_team, self.away_team, self.odds, self.predicted_prob]
    }
}

fn parse_number(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN)
}

fn optional_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|c| c.str().ok())
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Load the scored feed with the default column names
///
/// Missing optional columns fall back: `Sport` to Football, `Expected_Value`
/// to `p * odds - 1`, `isValueBet` to `EV > 0`, `FTR` to unplayed.
pub fn load_scored_feed<P: AsRef<Path>>(
    csv_path: P,
    date_hint: Option<DateFormat>,
) -> Result<Vec<ScoredMatchRecord>, LoadError> {
    load_scored_feed_with(csv_path, &FeedColumns::default(), date_hint)
}

/// Load the scored feed with custom column names
pub fn load_scored_feed_with<P: AsRef<Path>>(
    csv_path: P,
    columns: &FeedColumns,
    date_hint: Option<DateFormat>,
) -> Result<Vec<ScoredMatchRecord>, LoadError> {
    let path = csv_path.as_ref();
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "feed file not found"),
        });
    }

    // All columns as text
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for required in columns.required() {
        if !names.iter().any(|n| n == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let date_col = df.column(columns.date)?.str()?;
    let home_col = df.column(columns.home_team)?.str()?;
    let away_col = df.column(columns.away_team)?.str()?;
    let odds_col = df.column(columns.odds)?.str()?;
    let prob_col = df.column(columns.predicted_prob)?.str()?;
    let category_col = optional_column(&df, columns.category);
    let ev_col = optional_column(&df, columns.expected_value);
    let flag_col = optional_column(&df, columns.is_value_bet);
    let actual_col = optional_column(&df, columns.actual_outcome);
    let predicted_col = optional_column(&df, columns.predicted_outcome);

    let mut records = Vec::with_capacity(df.height());
    let mut undated = 0usize;
    let mut unreadable = 0usize;

    for i in 0..df.height() {
        let raw_date = date_col.get(i).unwrap_or("");
        let home = home_col.get(i).unwrap_or("").trim();
        let away = away_col.get(i).unwrap_or("").trim();

        let date = match parse_date_with_hint(raw_date, date_hint) {
            Ok(date) => Some(date),
            Err(_) => {
                undated += 1;
                None
            }
        };

        let odds = parse_number(odds_col.get(i));
        let predicted_prob = parse_number(prob_col.get(i));
        if !odds.is_finite() || !predicted_prob.is_finite() {
            unreadable += 1;
        }

        let expected_value = match ev_col.map(|c| parse_number(c.get(i))) {
            Some(ev) if ev.is_finite() => ev,
            _ => predicted_prob * odds - 1.0,
        };
        let is_value_bet = match flag_col.and_then(|c| c.get(i)) {
            Some(raw) => parse_value_flag(raw),
            None => expected_value > 0.0,
        };

        records.push(ScoredMatchRecord {
            match_id: MatchId::derive(home, away, raw_date),
            date,
            home_team: home.to_string(),
            away_team: away.to_string(),
            category: non_empty(category_col.and_then(|c| c.get(i)))
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            odds,
            predicted_prob,
            expected_value,
            is_value_bet,
            predicted_outcome: non_empty(predicted_col.and_then(|c| c.get(i))).unwrap_or_default(),
            actual_outcome: non_empty(actual_col.and_then(|c| c.get(i))),
        });
    }

    if undated > 0 {
        warn!(rows = undated, "feed rows with unparseable dates will be dropped");
    }
    if unreadable > 0 {
        warn!(rows = unreadable, "feed rows with unreadable odds or probability will be dropped");
    }
    info!(path = %path.display(), rows = records.len(), "loaded scored feed");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("valuebet_feed_{}_{}.csv", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    const FEED: &str = "\
Date,HomeTeam,AwayTeam,Sport,chosen_odds,chosen_prob,Expected_Value,isValueBet,FTR,FTR_pred
05/01/2024,Arsenal,Chelsea,Football,2.5,0.5,0.25,True,H,H
2024-01-06,Lakers,Celtics,Basketball,1.9,0.5,-0.05,False,A,H
garbage,Leeds,Wolves,,2.0,0.6,0.2,TRUE,,H
07/01/2024,Spurs,Everton,Football,n/a,0.6,,1,D,H
";

    #[test]
    fn test_load_scored_feed() {
        let path = write_fixture("full", FEED);
        let records = load_scored_feed(&path, None).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(records.len(), 4);

        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(first.home_team, "Arsenal");
        assert!((first.odds - 2.5).abs() < 1e-12);
        assert!(first.is_value_bet);
        assert!(first.is_win());
        assert_eq!(first.match_id, MatchId::derive("Arsenal", "Chelsea", "05/01/2024"));

        let second = &records[1];
        assert_eq!(second.category, "Basketball");
        assert!(!second.is_value_bet);
        assert!(!second.is_win());

        let third = &records[2];
        assert_eq!(third.date, None);
        assert_eq!(third.category, DEFAULT_CATEGORY);
        assert!(third.is_value_bet);
        assert_eq!(third.actual_outcome, None);

        let fourth = &records[3];
        assert!(fourth.odds.is_nan());
        assert!(fourth.is_value_bet);
    }

    #[test]
    fn test_optional_columns_fall_back() {
        let path = write_fixture(
            "minimal",
            "Date,HomeTeam,AwayTeam,chosen_odds,chosen_prob\n2024-02-01,A,B,3.0,0.4\n2024-02-02,C,D,2.0,0.4\n",
        );
        let records = load_scored_feed(&path, None).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert!((records[0].expected_value - 0.2).abs() < 1e-9);
        assert!(records[0].is_value_bet);
        assert!(!records[1].is_value_bet);
        assert_eq!(records[0].category, DEFAULT_CATEGORY);
        assert_eq!(records[0].actual_outcome, None);
    }

    #[test]
    fn test_date_hint() {
        let path = write_fixture(
            "hint",
            "Date,HomeTeam,AwayTeam,chosen_odds,chosen_prob\n03/04/2024,A,B,3.0,0.4\n",
        );
        let records = load_scored_feed(&path, Some(DateFormat::MonthFirst)).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn test_missing_required_column() {
        let path = write_fixture("missing", "Date,HomeTeam,AwayTeam,chosen_odds\n2024-02-01,A,B,3.0\n");
        let err = load_scored_feed(&path, None).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "chosen_prob"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_scored_feed("/nonexistent/feed.csv", None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
