//! Calendar month keys
//!
//! A [`MonthKey`] is the canonical `YYYY-MM` bucket used by the monthly
//! aggregations and summaries.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::CoercionMode;
use crate::error::{SpreadError, SpreadResult};

/// A calendar month, displayed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, validating the month number
    pub fn new(year: i32, month: u32) -> SpreadResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(SpreadError::Validation(format!(
                "Invalid month: {}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing a date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month containing a datetime
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self::from_date(dt.date())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Parse `YYYY-MM`
    pub fn parse(s: &str) -> SpreadResult<Self> {
        let invalid = || SpreadError::Validation(format!("Invalid month '{}'. Use YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// Parse `YYYY-MM`, falling back to the month of `today` in lenient mode
    pub fn parse_or_current(s: &str, mode: CoercionMode, today: NaiveDate) -> SpreadResult<Self> {
        match Self::parse(s) {
            Ok(key) => Ok(key),
            Err(err) if mode.is_strict() => Err(err),
            Err(_) => {
                tracing::warn!(month = s, "unparsable month, using current month");
                Ok(Self::from_date(today))
            }
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Half-open datetime bounds `[start, end)` of the month
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.first_day().and_time(chrono::NaiveTime::MIN);
        let end = self.next().first_day().and_time(chrono::NaiveTime::MIN);
        (start, end)
    }

    /// Check if a datetime falls within this month
    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        let (start, end) = self.bounds();
        dt >= start && dt < end
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = SpreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let key = MonthKey::parse("2025-03").unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2025-03");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(MonthKey::parse("2025-13").is_err());
        assert!(MonthKey::parse("2025-3").is_err());
        assert!(MonthKey::parse("March").is_err());
        assert!(MonthKey::parse("2025-03-01").is_err());
    }

    #[test]
    fn test_parse_or_current() {
        let today = date(2025, 6, 14);
        let key = MonthKey::parse_or_current("nope", CoercionMode::Lenient, today).unwrap();
        assert_eq!(key.to_string(), "2025-06");

        assert!(MonthKey::parse_or_current("nope", CoercionMode::Strict, today).is_err());
    }

    #[test]
    fn test_bounds_wrap_year() {
        let key = MonthKey::new(2024, 12).unwrap();
        let (start, end) = key.bounds();
        assert_eq!(start.date(), date(2024, 12, 1));
        assert_eq!(end.date(), date(2025, 1, 1));
        assert!(key.contains(date(2024, 12, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!key.contains(end));
    }

    #[test]
    fn test_ordering() {
        let a = MonthKey::parse("2024-12").unwrap();
        let b = MonthKey::parse("2025-01").unwrap();
        assert!(a < b);
        assert_eq!(a.next(), b);
    }

    #[test]
    fn test_serde() {
        let key = MonthKey::parse("2025-01").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
