//! Income allocation
//!
//! Splits a monthly income into per-category dollar amounts that add back up
//! to the income to the cent.

use serde::{Deserialize, Serialize};

use super::normalize::normalize_rules_with;
use crate::models::{round_money, to_float, AllocationConfig, AllocationRules, CategoryTotals};

/// Dollars assigned to each category for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyAllocation(CategoryTotals);

impl MonthlyAllocation {
    /// Amount assigned to a category
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Sum of all buckets, rounded to cents
    pub fn total(&self) -> f64 {
        round_money(self.0.values().sum())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Borrow as a plain category map (e.g. as the planned side of a compliance report)
    pub fn as_totals(&self) -> &CategoryTotals {
        &self.0
    }

    pub fn into_totals(self) -> CategoryTotals {
        self.0
    }
}

/// Allocate income with the default configuration
pub fn allocate_budget(income: f64, rules: Option<&AllocationRules>) -> MonthlyAllocation {
    allocate_budget_with(income, rules, &AllocationConfig::default())
}

/// Allocate income across categories
///
/// Negative or non-finite income is treated as 0. When the normalized weights
/// sum to 0 the whole income lands in the unallocated bucket; when they sum
/// above 1.0 they are rescaled proportionally. Each category receives
/// `round(income * fraction, 2)` and the cent remainder goes to the
/// unallocated bucket. A negative remainder (several shares rounding up) is
/// taken back one cent per bucket, largest first, so no amount is ever
/// negative.
pub fn allocate_budget_with(
    income: f64,
    rules: Option<&AllocationRules>,
    config: &AllocationConfig,
) -> MonthlyAllocation {
    let income = round_money(to_float(Some(income)).max(0.0));
    let mut fractions = normalize_rules_with(rules, config);
    let total: f64 = fractions.values().sum();

    tracing::debug!(
        income,
        categories = fractions.len(),
        weight_total = total,
        "allocating budget"
    );

    let mut alloc = CategoryTotals::new();

    if total == 0.0 {
        alloc.insert(config.unallocated_label.clone(), income);
        return MonthlyAllocation(alloc);
    }

    if total > 1.0 {
        for fraction in fractions.values_mut() {
            *fraction /= total;
        }
    }

    for (category, fraction) in fractions {
        alloc.insert(category, round_money(income * fraction));
    }

    let remainder = round_money(income - alloc.values().sum::<f64>());
    if remainder > 0.0 {
        let bucket = alloc.entry(config.unallocated_label.clone()).or_insert(0.0);
        *bucket = round_money(*bucket + remainder);
    } else if remainder < 0.0 {
        take_back_cents(&mut alloc, (-remainder * 100.0).round() as u64);
    }

    MonthlyAllocation(alloc)
}

/// Remove `cents` one cent at a time, cycling from the largest bucket down
///
/// Equal amounts keep label order. A bucket at zero is skipped.
fn take_back_cents(alloc: &mut CategoryTotals, mut cents: u64) {
    let mut order: Vec<String> = alloc.keys().cloned().collect();
    order.sort_by(|a, b| alloc[b].total_cmp(&alloc[a]));

    while cents > 0 {
        let mut taken = false;
        for label in &order {
            if cents == 0 {
                break;
            }
            if let Some(bucket) = alloc.get_mut(label) {
                if *bucket > 0.0 {
                    *bucket = round_money(*bucket - 0.01);
                    cents -= 1;
                    taken = true;
                }
            }
        }
        if !taken {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergeStrategy, Weight};

    fn rules(pairs: &[(&str, f64)]) -> AllocationRules {
        AllocationRules::from_weights(pairs.iter().map(|(k, v)| (*k, *v))).unwrap()
    }

    #[test]
    fn test_default_split() {
        let alloc = allocate_budget(1000.0, Some(&AllocationRules::new()));
        assert_eq!(alloc.len(), 3);
        assert_eq!(alloc.get("Needs"), Some(500.0));
        assert_eq!(alloc.get("Wants"), Some(300.0));
        assert_eq!(alloc.get("Savings"), Some(200.0));
        assert_eq!(alloc.get("Unallocated"), None);
    }

    #[test]
    fn test_partial_rules_leave_unallocated() {
        let alloc = allocate_budget(2000.0, Some(&rules(&[("Rent", 0.4), ("Food", 0.2)])));
        assert_eq!(alloc.get("Rent"), Some(800.0));
        assert_eq!(alloc.get("Food"), Some(400.0));
        assert_eq!(alloc.get("Unallocated"), Some(800.0));
        assert_eq!(alloc.total(), 2000.0);
    }

    #[test]
    fn test_oversubscribed_rules_rescaled() {
        let alloc = allocate_budget(900.0, Some(&rules(&[("A", 60.0), ("B", 60.0), ("C", 60.0)])));
        assert_eq!(alloc.get("A"), Some(300.0));
        assert_eq!(alloc.get("B"), Some(300.0));
        assert_eq!(alloc.get("C"), Some(300.0));
        assert_eq!(alloc.get("Unallocated"), None);
    }

    #[test]
    fn test_zero_weights_go_unallocated() {
        let alloc = allocate_budget(1234.567, Some(&rules(&[("A", 0.0), ("B", -1.0)])));
        assert_eq!(alloc.len(), 1);
        assert_eq!(alloc.get("Unallocated"), Some(1234.57));
    }

    #[test]
    fn test_rounding_remainder_goes_unallocated() {
        let mut thirds = AllocationRules::new();
        for label in ["A", "B", "C"] {
            thirds.insert(label, Weight::Fraction(1.0)).unwrap();
        }
        let alloc = allocate_budget(100.0, Some(&thirds));
        assert_eq!(alloc.get("A"), Some(33.33));
        assert_eq!(alloc.get("C"), Some(33.33));
        assert_eq!(alloc.get("Unallocated"), Some(0.01));
        assert!((alloc.total() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_remainder_never_negative_bucket() {
        // Two half-cent shares both round up
        let alloc = allocate_budget(0.01, Some(&rules(&[("A", 0.5), ("B", 0.5)])));
        assert!(alloc.iter().all(|(_, v)| v >= 0.0));
        assert!((alloc.total() - 0.01).abs() < 1e-9);
        assert_eq!(alloc.get("Unallocated"), None);
    }

    #[test]
    fn test_shortfall_spread_across_buckets() {
        let quarters = rules(&[("A", 0.25), ("B", 0.25), ("C", 0.25), ("D", 0.25)]);

        let tiny = allocate_budget(0.02, Some(&quarters));
        assert!(tiny.iter().all(|(_, v)| v >= 0.0), "{:?}", tiny);
        assert!((tiny.total() - 0.02).abs() < 1e-9);
        assert_eq!(tiny.get("A"), Some(0.0));
        assert_eq!(tiny.get("B"), Some(0.0));
        assert_eq!(tiny.get("C"), Some(0.01));
        assert_eq!(tiny.get("D"), Some(0.01));

        let alloc = allocate_budget(100.02, Some(&quarters));
        assert_eq!(alloc.get("A"), Some(25.0));
        assert_eq!(alloc.get("B"), Some(25.0));
        assert_eq!(alloc.get("C"), Some(25.01));
        assert_eq!(alloc.get("D"), Some(25.01));
        assert!((alloc.total() - 100.02).abs() < 1e-6);
        assert_eq!(alloc.get("Unallocated"), None);
    }

    #[test]
    fn test_negative_income_is_zero() {
        let alloc = allocate_budget(-50.0, None);
        assert!(alloc.iter().all(|(_, v)| v == 0.0));
        assert_eq!(alloc.total(), 0.0);
    }

    #[test]
    fn test_sum_matches_rounded_income() {
        let rule_sets = [
            rules(&[("A", 0.37), ("B", 0.21), ("C", 0.13)]),
            rules(&[("A", 33.0), ("B", 33.0), ("C", 33.0)]),
            rules(&[("A", 7.0), ("B", 3.0)]),
            rules(&[("A", 0.25), ("B", 0.25), ("C", 0.25), ("D", 0.25)]),
            rules(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0), ("E", 1.0), ("F", 1.0)]),
            AllocationRules::new(),
        ];
        for income in [0.0, 0.01, 0.02, 0.03, 1.0, 99.99, 100.02, 1000.0, 1234.567, 98765.43] {
            for r in &rule_sets {
                let alloc = allocate_budget(income, Some(r));
                assert!(
                    (alloc.total() - round_money(income)).abs() < 1e-6,
                    "income {} rules {:?}",
                    income,
                    r
                );
                assert!(alloc.iter().all(|(_, v)| v >= 0.0));
            }
        }
    }

    #[test]
    fn test_existing_unallocated_category_is_topped_up() {
        let mut r = AllocationRules::new();
        r.insert("Unallocated", Weight::Fraction(0.1)).unwrap();
        r.insert("Rent", Weight::Fraction(0.5)).unwrap();
        let alloc = allocate_budget(1000.0, Some(&r));
        assert_eq!(alloc.get("Unallocated"), Some(500.0));
        assert_eq!(alloc.get("Rent"), Some(500.0));
    }

    #[test]
    fn test_custom_unallocated_label() {
        let config = AllocationConfig {
            unallocated_label: "Buffer".into(),
            merge: MergeStrategy::Replace,
            ..AllocationConfig::default()
        };
        let alloc = allocate_budget_with(100.0, Some(&rules(&[("A", 0.5)])), &config);
        assert_eq!(alloc.get("Buffer"), Some(50.0));
    }

    #[test]
    fn test_idempotent() {
        let r = rules(&[("A", 0.37), ("B", 0.21)]);
        assert_eq!(allocate_budget(777.77, Some(&r)), allocate_budget(777.77, Some(&r)));
    }
}
