//! Flexible Date Parsing
//!
//! Scored-match feeds carry dates in several layouts. Parsers are tried in a
//! fixed order: ISO (`YYYY-MM-DD`, also the date part of an RFC 3339
//! timestamp), then day-first (`DD/MM/YYYY`), then month-first (`MM/DD/YYYY`).
//!
//! Day-first wins ties: `01/02/2024` is 1 February 2024. When a source knows
//! its layout it should pass a [`DateFormat`] hint instead of relying on the
//! fallback order.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

/// Date parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,

    #[error("unrecognised date format: {0:?}")]
    Unrecognised(String),
}

/// Known date layouts in the scored-match feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Iso,
    /// `DD/MM/YYYY` or `DD/MM/YY`
    DayFirst,
    /// `MM/DD/YYYY` or `MM/DD/YY`
    MonthFirst,
}

/// Fallback order when no hint is given
const FALLBACK_ORDER: [DateFormat; 3] = [DateFormat::Iso, DateFormat::DayFirst, DateFormat::MonthFirst];

impl DateFormat {
    /// Parse a string with this layout only
    pub fn parse(self, input: &str) -> Option<NaiveDate> {
        match self {
            DateFormat::Iso => NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive())),
            DateFormat::DayFirst => parse_slashed(input, "%d/%m/%Y", "%d/%m/%y"),
            DateFormat::MonthFirst => parse_slashed(input, "%m/%d/%Y", "%m/%d/%y"),
        }
    }
}

/// Slashed dates: pick the two-digit-year pattern when the year part is short,
/// otherwise `%Y` would read `24` as the year 24.
fn parse_slashed(input: &str, long_year: &str, short_year: &str) -> Option<NaiveDate> {
    let year_part = input.rsplit('/').next()?;
    let pattern = if year_part.len() == 2 { short_year } else { long_year };
    NaiveDate::parse_from_str(input, pattern).ok()
}

/// Parse a feed date, trying ISO, then day-first, then month-first
///
/// # Examples
/// ```
/// use valuebet::core::dates::parse_flexible_date;
/// let date = parse_flexible_date("01/02/2024").unwrap();
/// assert_eq!(date.to_string(), "2024-02-01");
/// ```
pub fn parse_flexible_date(input: &str) -> Result<NaiveDate, DateParseError> {
    parse_date_with_hint(input, None)
}

/// Parse a feed date, using `hint` exclusively when the source declared one
pub fn parse_date_with_hint(input: &str, hint: Option<DateFormat>) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::Empty);
    }

    let parsed = match hint {
        Some(format) => format.parse(trimmed),
        None => FALLBACK_ORDER.iter().find_map(|format| format.parse(trimmed)),
    };

    parsed.ok_or_else(|| DateParseError::Unrecognised(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_flexible_date("2024-01-05"), Ok(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        assert_eq!(
            parse_flexible_date("2024-03-09T18:30:00Z"),
            Ok(ymd(2024, 3, 9))
        );
    }

    #[test]
    fn test_day_first_wins_ties() {
        assert_eq!(parse_flexible_date("01/02/2024"), Ok(ymd(2024, 2, 1)));
        assert_eq!(parse_flexible_date("03/04/2024"), Ok(ymd(2024, 4, 3)));
    }

    #[test]
    fn test_month_first_fallback() {
        // 13 cannot be a month, so only month-first parses
        assert_eq!(parse_flexible_date("12/13/2024"), Ok(ymd(2024, 12, 13)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_flexible_date("19/08/23"), Ok(ymd(2023, 8, 19)));
    }

    #[test]
    fn test_hint_overrides_fallback_order() {
        assert_eq!(
            parse_date_with_hint("03/04/2024", Some(DateFormat::MonthFirst)),
            Ok(ymd(2024, 3, 4))
        );
        assert!(parse_date_with_hint("2024-03-04", Some(DateFormat::DayFirst)).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_flexible_date("   "), Err(DateParseError::Empty));
        assert!(matches!(
            parse_flexible_date("next tuesday"),
            Err(DateParseError::Unrecognised(_))
        ));
        assert!(parse_flexible_date("31/02/2024").is_err());
    }
}
