//! Calendar utilities for the weekly withdrawal window.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Date format used by operation input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an operation date in [`DATE_FORMAT`].
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

/// A Monday to Sunday calendar week, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    /// Monday on or before the reference date.
    pub start: NaiveDate,
    /// Sunday on or after the reference date.
    pub end: NaiveDate,
}

impl Week {
    /// The week that contains `date`. A Monday starts its own week and a
    /// Sunday ends its own week.
    ///
    /// Weeks at the edges of the representable calendar are clamped to
    /// [`NaiveDate::MIN`] and [`NaiveDate::MAX`].
    pub fn containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_signed(Duration::days(offset))
            .unwrap_or(NaiveDate::MIN);
        let end = start
            .checked_add_signed(Duration::days(6))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Check whether `date` falls inside this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_of_midweek_date() {
        // Wednesday
        let week = Week::containing(date(2014, 12, 31));
        assert_eq!(week.start, date(2014, 12, 29));
        assert_eq!(week.end, date(2015, 1, 4));
        assert!(week.contains(date(2015, 1, 1)));
        assert!(!week.contains(date(2015, 1, 5)));
    }

    #[test]
    fn test_monday_starts_its_own_week() {
        let week = Week::containing(date(2016, 1, 4));
        assert_eq!(week.start, date(2016, 1, 4));
        assert_eq!(week.end, date(2016, 1, 10));
        assert!(!week.contains(date(2016, 1, 3)));
    }

    #[test]
    fn test_sunday_ends_its_own_week() {
        let week = Week::containing(date(2016, 1, 10));
        assert_eq!(week.start, date(2016, 1, 4));
        assert_eq!(week.end, date(2016, 1, 10));
    }

    #[test]
    fn test_week_at_calendar_edges() {
        let last = Week::containing(NaiveDate::MAX);
        assert_eq!(last.end, NaiveDate::MAX);
        assert!(last.contains(NaiveDate::MAX));

        let first = Week::containing(NaiveDate::MIN);
        assert_eq!(first.start, NaiveDate::MIN);
        assert!(first.contains(NaiveDate::MIN));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2016-01-05").unwrap(), date(2016, 1, 5));
        assert!(parse_date("05/01/2016").is_err());
    }
}
