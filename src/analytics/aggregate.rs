//! Purchase aggregation
//!
//! Single-pass roll-ups of purchase records by category and by calendar
//! month, plus the monthly summary and purchase filtering built on them.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SpreadResult;
use crate::models::{
    month_key, round_money, to_float, CategoryTotals, CoercionMode, MonthKey, PurchaseRecord,
    Timestamp,
};

/// How timestamps are coerced while aggregating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Strict or lenient handling of bad timestamps
    pub mode: CoercionMode,
    /// Processing time that unparsable timestamps fall back to in lenient mode
    pub now: NaiveDateTime,
}

impl AggregateOptions {
    /// Options with the given mode, stamped with the current UTC time
    pub fn new(mode: CoercionMode) -> Self {
        Self {
            mode,
            now: Utc::now().naive_utc(),
        }
    }

    /// Pin the fallback processing time
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self::new(CoercionMode::default())
    }
}

/// Month → total spent
pub type MonthlyTotals = BTreeMap<MonthKey, f64>;

/// Total spent per category
///
/// Missing or blank categories are grouped under `Unknown`.
pub fn aggregate_by_category(purchases: &[PurchaseRecord]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for purchase in purchases {
        *totals.entry(purchase.category_label().to_string()).or_insert(0.0) +=
            to_float(Some(purchase.amount));
    }
    totals.values_mut().for_each(|v| *v = round_money(*v));
    totals
}

/// Total spent per `YYYY-MM` month
///
/// # Errors
///
/// In strict mode, fails on the first purchase whose timestamp is missing or
/// unparsable.
pub fn aggregate_by_month(
    purchases: &[PurchaseRecord],
    options: &AggregateOptions,
) -> SpreadResult<MonthlyTotals> {
    let mut totals = MonthlyTotals::new();
    for purchase in purchases {
        let key = month_key(purchase.occurred_at.as_ref(), options.mode, options.now)?;
        *totals.entry(key).or_insert(0.0) += to_float(Some(purchase.amount));
    }
    totals.values_mut().for_each(|v| *v = round_money(*v));
    Ok(totals)
}

/// Spending summary for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// The summarized month
    pub month: MonthKey,
    /// Total spent in the month
    pub total_spent: f64,
    /// Per-category breakdown
    pub by_category: CategoryTotals,
    /// Number of purchases in the month
    pub purchase_count: usize,
}

/// Summarize the purchases that fall within `month`
pub fn month_summary(
    purchases: &[PurchaseRecord],
    month: MonthKey,
    options: &AggregateOptions,
) -> SpreadResult<MonthSummary> {
    let in_month = resolved(purchases, options)?
        .into_iter()
        .filter(|(_, at)| month.contains(*at))
        .map(|(p, _)| p.clone())
        .collect::<Vec<_>>();

    let by_category = aggregate_by_category(&in_month);
    let total_spent = round_money(in_month.iter().map(|p| to_float(Some(p.amount))).sum());

    Ok(MonthSummary {
        month,
        total_spent,
        by_category,
        purchase_count: in_month.len(),
    })
}

/// Criteria for [`filter_purchases`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseFilter {
    /// Only purchases within this month
    pub month: Option<MonthKey>,
    /// Only purchases in this category (case-insensitive)
    pub category: Option<String>,
}

/// Purchases matching a filter, newest first
pub fn filter_purchases<'a>(
    purchases: &'a [PurchaseRecord],
    filter: &PurchaseFilter,
    options: &AggregateOptions,
) -> SpreadResult<Vec<&'a PurchaseRecord>> {
    let mut matched: Vec<(&PurchaseRecord, NaiveDateTime)> = resolved(purchases, options)?
        .into_iter()
        .filter(|(_, at)| filter.month.map_or(true, |m| m.contains(*at)))
        .filter(|(p, _)| {
            filter
                .category
                .as_deref()
                .map_or(true, |c| p.category_label().eq_ignore_ascii_case(c.trim()))
        })
        .collect();

    // Stable sort keeps input order among purchases at the same instant
    matched.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(matched.into_iter().map(|(p, _)| p).collect())
}

fn resolved<'a>(
    purchases: &'a [PurchaseRecord],
    options: &AggregateOptions,
) -> SpreadResult<Vec<(&'a PurchaseRecord, NaiveDateTime)>> {
    purchases
        .iter()
        .map(|p| {
            Timestamp::resolve(p.occurred_at.as_ref(), options.mode, options.now).map(|at| (p, at))
        })
        .collect()
}
