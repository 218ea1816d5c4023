//! Planned vs. actual compliance
//!
//! Compares a budget plan with what was actually spent, category by category.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{round_money, round_to, to_float, CategoryTotals};

/// Upper bound of the reported compliance ratio
pub const COMPLIANCE_RATIO_CAP: f64 = 9.99;

/// Result of comparing a plan with actual spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Sum of planned amounts
    pub total_planned: f64,
    /// Sum of actual spending
    pub total_actual: f64,
    /// `total_actual / total_planned`, capped at 9.99; 1.0 when nothing was planned
    pub compliance_ratio: f64,
    /// Categories where actual exceeded plan, by how much
    pub overruns: CategoryTotals,
    /// Categories where actual fell short of plan, by how much
    pub underruns: CategoryTotals,
}

impl ComplianceResult {
    /// Whether spending stayed within the planned total
    pub fn is_within_plan(&self) -> bool {
        self.compliance_ratio <= 1.0
    }

    /// Net amount over plan across all categories (negative when under)
    pub fn net_overrun(&self) -> f64 {
        round_money(self.overruns.values().sum::<f64>() - self.underruns.values().sum::<f64>())
    }
}

/// Compare planned amounts with actual spending
///
/// Categories missing on one side count as 0 there. Zero deltas appear in
/// neither `overruns` nor `underruns`.
pub fn compliance_report(planned: &CategoryTotals, actual: &CategoryTotals) -> ComplianceResult {
    let value = |map: &CategoryTotals, key: &str| to_float(map.get(key).copied());

    let total_planned: f64 = planned.values().map(|v| to_float(Some(*v))).sum();
    let total_actual: f64 = actual.values().map(|v| to_float(Some(*v))).sum();

    let categories: BTreeSet<&String> = planned.keys().chain(actual.keys()).collect();

    let mut overruns = CategoryTotals::new();
    let mut underruns = CategoryTotals::new();

    for category in categories {
        let delta = value(actual, category) - value(planned, category);
        if delta > 0.0 {
            overruns.insert(category.clone(), round_money(delta));
        } else if delta < 0.0 {
            underruns.insert(category.clone(), round_money(-delta));
        }
    }

    let compliance_ratio = if total_planned == 0.0 {
        1.0
    } else {
        round_to((total_actual / total_planned).min(COMPLIANCE_RATIO_CAP), 4)
    };

    tracing::debug!(total_planned, total_actual, compliance_ratio, "compliance computed");

    ComplianceResult {
        total_planned: round_money(total_planned),
        total_actual: round_money(total_actual),
        compliance_ratio,
        overruns,
        underruns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(pairs: &[(&str, f64)]) -> CategoryTotals {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_overrun() {
        let result = compliance_report(&totals(&[("Food", 100.0)]), &totals(&[("Food", 150.0)]));
        assert_eq!(result.overruns, totals(&[("Food", 50.0)]));
        assert!(result.underruns.is_empty());
        assert_eq!(result.compliance_ratio, 1.5);
        assert!(!result.is_within_plan());
    }

    #[test]
    fn test_zero_planned_guard() {
        let result = compliance_report(&CategoryTotals::new(), &totals(&[("Food", 10.0)]));
        assert_eq!(result.total_planned, 0.0);
        assert_eq!(result.total_actual, 10.0);
        assert_eq!(result.compliance_ratio, 1.0);
        assert_eq!(result.overruns, totals(&[("Food", 10.0)]));
    }

    #[test]
    fn test_mixed_categories() {
        let planned = totals(&[("Rent", 1200.0), ("Food", 400.0), ("Fun", 100.0)]);
        let actual = totals(&[("Rent", 1200.0), ("Food", 350.25), ("Travel", 80.0)]);
        let result = compliance_report(&planned, &actual);

        assert_eq!(result.overruns, totals(&[("Travel", 80.0)]));
        assert_eq!(result.underruns, totals(&[("Food", 49.75), ("Fun", 100.0)]));
        assert!(!result.overruns.contains_key("Rent"));
        assert!(!result.underruns.contains_key("Rent"));
        assert_eq!(result.total_planned, 1700.0);
        assert_eq!(result.total_actual, 1630.25);
        assert_eq!(result.compliance_ratio, 0.959);
        assert!(result.is_within_plan());
        assert_eq!(result.net_overrun(), -69.75);
    }

    #[test]
    fn test_ratio_capped() {
        let result = compliance_report(&totals(&[("A", 1.0)]), &totals(&[("A", 500.0)]));
        assert_eq!(result.compliance_ratio, 9.99);
    }

    #[test]
    fn test_non_finite_values_count_as_zero() {
        let result = compliance_report(
            &totals(&[("A", f64::NAN), ("B", 10.0)]),
            &totals(&[("A", 5.0), ("B", 10.0)]),
        );
        assert_eq!(result.total_planned, 10.0);
        assert_eq!(result.overruns, totals(&[("A", 5.0)]));
        assert_eq!(result.compliance_ratio, 1.5);
    }

    #[test]
    fn test_idempotent() {
        let planned = totals(&[("Food", 100.0), ("Rent", 900.0)]);
        let actual = totals(&[("Food", 130.0), ("Fun", 20.0)]);
        assert_eq!(
            compliance_report(&planned, &actual),
            compliance_report(&planned, &actual)
        );
    }
}
