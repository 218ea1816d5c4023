//! No-spend streaks

use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::aggregate::AggregateOptions;
use crate::error::SpreadResult;
use crate::models::{PurchaseRecord, Timestamp};

/// Longest run of consecutive purchase-free days between two purchase days
///
/// Only interior gaps count: the days before the first purchase and after the
/// last one are unbounded and ignored. Empty or single-day input yields 0.
pub fn longest_no_spend_streak<I>(purchase_dates: I) -> i64
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = purchase_dates.into_iter().collect();

    days.iter()
        .zip(days.iter().skip(1))
        .map(|(earlier, later)| (*later - *earlier).num_days() - 1)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Distinct calendar days on which purchases happened, ascending
pub fn purchase_dates(
    purchases: &[PurchaseRecord],
    options: &AggregateOptions,
) -> SpreadResult<BTreeSet<NaiveDate>> {
    purchases
        .iter()
        .map(|p| {
            Timestamp::resolve(p.occurred_at.as_ref(), options.mode, options.now)
                .map(|dt| dt.date())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoercionMode;
    use chrono::Duration;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_gap_between_two_days() {
        assert_eq!(longest_no_spend_streak([day(1), day(1) + Duration::days(4)]), 3);
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(longest_no_spend_streak(Vec::<NaiveDate>::new()), 0);
        assert_eq!(longest_no_spend_streak([day(5)]), 0);
    }

    #[test]
    fn test_duplicates_and_order_ignored() {
        let dates = [day(10), day(2), day(2), day(3), day(10), day(4)];
        // Gap between the 4th and the 10th: 5..=9
        assert_eq!(longest_no_spend_streak(dates), 5);
    }

    #[test]
    fn test_consecutive_days() {
        assert_eq!(longest_no_spend_streak([day(1), day(2), day(3)]), 0);
    }

    #[test]
    fn test_across_month_boundary() {
        let feb_27 = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let mar_2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        // Feb 28, Feb 29, Mar 1
        assert_eq!(longest_no_spend_streak([feb_27, mar_2]), 3);
    }

    #[test]
    fn test_purchase_dates_from_records() {
        let options = AggregateOptions::new(CoercionMode::Strict);
        let purchases = vec![
            PurchaseRecord::new("Food", 1.0).on(day(3)),
            PurchaseRecord::new("Food", 2.0).at(day(3).and_hms_opt(18, 0, 0).unwrap()),
            PurchaseRecord::new("Fun", 3.0).at_text("2025-03-09T10:00:00"),
        ];
        let dates = purchase_dates(&purchases, &options).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(longest_no_spend_streak(dates), 5);
    }
}
