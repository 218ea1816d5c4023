//! Purchase records
//!
//! The engine only ever reads purchases; whoever owns them (a database, a CSV
//! export, an API payload) hands over a slice of [`PurchaseRecord`] per call.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::CoercionMode;
use super::month::MonthKey;
use crate::error::{SpreadError, SpreadResult};

/// Category label used when a purchase has none
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// When a purchase happened
///
/// Text is kept as received and only parsed when a calendar position is
/// actually needed, so one bad row does not have to fail a whole import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// A calendar date (midnight is assumed where a time is needed)
    Date(NaiveDate),
    /// A date and time
    DateTime(NaiveDateTime),
    /// ISO-8601 text, or an already canonical `YYYY-MM`
    Text(String),
}

impl Timestamp {
    /// Resolve to a datetime
    ///
    /// Missing or unparsable timestamps resolve to `now` in lenient mode and
    /// fail with a coercion error in strict mode.
    pub fn resolve(
        ts: Option<&Timestamp>,
        mode: CoercionMode,
        now: NaiveDateTime,
    ) -> SpreadResult<NaiveDateTime> {
        let parsed = match ts {
            Some(Self::Date(d)) => Some(d.and_time(NaiveTime::MIN)),
            Some(Self::DateTime(dt)) => Some(*dt),
            Some(Self::Text(s)) => parse_iso(s),
            None => None,
        };

        match parsed {
            Some(dt) => Ok(dt),
            None if mode.is_strict() => Err(SpreadError::bad_date(describe(ts))),
            None => {
                tracing::warn!(
                    value = %describe(ts),
                    "unparsable timestamp, using processing time"
                );
                Ok(now)
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d),
            Self::DateTime(dt) => write!(f, "{}", dt),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn describe(ts: Option<&Timestamp>) -> String {
    ts.map_or_else(|| "<missing>".to_string(), ToString::to_string)
}

/// Parse the ISO-8601 shapes purchase feeds commonly carry
///
/// A datetime with an offset keeps its local wall-clock time, so a purchase
/// at 23:30-05:00 on Jan 31 still lands in January.
fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    MonthKey::parse(s).ok().map(|m| m.first_day().and_time(NaiveTime::MIN))
}

/// Derive the `YYYY-MM` key of a timestamp
///
/// Canonical `YYYY-MM` text passes through unchanged.
pub fn month_key(
    ts: Option<&Timestamp>,
    mode: CoercionMode,
    now: NaiveDateTime,
) -> SpreadResult<MonthKey> {
    if let Some(Timestamp::Text(s)) = ts {
        if let Ok(key) = MonthKey::parse(s) {
            return Ok(key);
        }
    }
    Timestamp::resolve(ts, mode, now).map(MonthKey::from_datetime)
}

/// A single logged purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Category label; `None` or blank means uncategorized
    #[serde(default)]
    pub category: Option<String>,

    /// Amount spent in dollars
    #[serde(default)]
    pub amount: f64,

    /// When the purchase happened
    #[serde(default)]
    pub occurred_at: Option<Timestamp>,

    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PurchaseRecord {
    /// Create a purchase with a category and amount
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: Some(category.into()),
            amount,
            occurred_at: None,
            note: None,
        }
    }

    /// Set the timestamp to a calendar date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.occurred_at = Some(Timestamp::Date(date));
        self
    }

    /// Set the timestamp to a date and time
    pub fn at(mut self, dt: NaiveDateTime) -> Self {
        self.occurred_at = Some(Timestamp::DateTime(dt));
        self
    }

    /// Set the timestamp to raw text
    pub fn at_text(mut self, text: impl Into<String>) -> Self {
        self.occurred_at = Some(Timestamp::Text(text.into()));
        self
    }

    /// The category label, with blank or missing labels mapped to `Unknown`
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => UNKNOWN_CATEGORY,
        }
    }
}
