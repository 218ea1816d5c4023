//! Rule normalization
//!
//! Turns caller allocation rules into fractional weights.

use crate::models::{AllocationConfig, AllocationRules, MergeStrategy, Weight};
use std::collections::BTreeMap;

/// Category label → fraction of income
pub type NormalizedRules = BTreeMap<String, f64>;

/// Normalize rules against the default 50/30/20 configuration
pub fn normalize_rules(rules: Option<&AllocationRules>) -> NormalizedRules {
    normalize_rules_with(rules, &AllocationConfig::default())
}

/// Normalize rules into fractional weights
///
/// `Fraction` weights are taken as-is and `Percent` weights are divided by
/// 100. `Auto` weights are resolved as a group: when their sum exceeds 1.0
/// and every one of them is at least 1.0 they are read as percentages,
/// otherwise as fractions. Negative results clamp to 0; there is no upper
/// clamp, the allocator rescales sums above 1.0.
pub fn normalize_rules_with(
    rules: Option<&AllocationRules>,
    config: &AllocationConfig,
) -> NormalizedRules {
    let merged = merge(rules, config);

    let auto: Vec<f64> = merged
        .values()
        .filter_map(|w| match w {
            Weight::Auto(v) => Some(finite(*v)),
            _ => None,
        })
        .collect();
    let auto_is_percent =
        auto.iter().sum::<f64>() > 1.0 && auto.iter().all(|v| *v >= 1.0);

    merged
        .into_iter()
        .map(|(label, weight)| {
            let fraction = match weight {
                Weight::Fraction(v) => finite(v),
                Weight::Percent(v) => finite(v) / 100.0,
                Weight::Auto(v) if auto_is_percent => finite(v) / 100.0,
                Weight::Auto(v) => finite(v),
            };
            (label, fraction.max(0.0))
        })
        .collect()
}

fn merge(rules: Option<&AllocationRules>, config: &AllocationConfig) -> BTreeMap<String, Weight> {
    let caller = rules.filter(|r| !r.is_empty());
    let defaults = config.defaults.iter().map(|(k, w)| (k.to_string(), *w));

    match (caller, config.merge) {
        (None, _) => defaults.collect(),
        (Some(rules), MergeStrategy::Replace) => {
            rules.iter().map(|(k, w)| (k.to_string(), *w)).collect()
        }
        (Some(rules), MergeStrategy::Overlay) => {
            let mut merged: BTreeMap<String, Weight> = defaults.collect();
            merged.extend(rules.iter().map(|(k, w)| (k.to_string(), *w)));
            merged
        }
    }
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, f64)]) -> AllocationRules {
        AllocationRules::from_weights(pairs.iter().map(|(k, v)| (*k, *v))).unwrap()
    }

    #[test]
    fn test_percentages_detected() {
        let out = normalize_rules(Some(&rules(&[("A", 50.0), ("B", 50.0)])));
        assert_eq!(out.len(), 2);
        assert_eq!(out["A"], 0.5);
        assert_eq!(out["B"], 0.5);
    }

    #[test]
    fn test_fractions_unchanged() {
        let out = normalize_rules(Some(&rules(&[("A", 0.5), ("B", 0.3)])));
        assert_eq!(out["A"], 0.5);
        assert_eq!(out["B"], 0.3);
    }

    #[test]
    fn test_mixed_auto_values_stay_fractional() {
        // 50 and 0.5 together do not look like percentages
        let out = normalize_rules(Some(&rules(&[("A", 50.0), ("B", 0.5)])));
        assert_eq!(out["A"], 50.0);
        assert_eq!(out["B"], 0.5);
    }

    #[test]
    fn test_single_full_weight_is_fraction() {
        let out = normalize_rules(Some(&rules(&[("Everything", 1.0)])));
        assert_eq!(out["Everything"], 1.0);

        let mut explicit = AllocationRules::new();
        explicit.insert("Everything", Weight::Percent(1.0)).unwrap();
        assert_eq!(normalize_rules(Some(&explicit))["Everything"], 0.01);
    }

    #[test]
    fn test_tagged_units() {
        let mut r = AllocationRules::new();
        r.insert("Rent", Weight::Percent(40.0)).unwrap();
        r.insert("Food", Weight::Fraction(0.2)).unwrap();
        let out = normalize_rules(Some(&r));
        assert_eq!(out["Rent"], 0.4);
        assert_eq!(out["Food"], 0.2);
    }

    #[test]
    fn test_negative_clamped() {
        let out = normalize_rules(Some(&rules(&[("A", -0.2), ("B", 0.4)])));
        assert_eq!(out["A"], 0.0);
        assert_eq!(out["B"], 0.4);
    }

    #[test]
    fn test_defaults_when_absent_or_empty() {
        let expected: NormalizedRules = [("Needs", 0.5), ("Savings", 0.2), ("Wants", 0.3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(normalize_rules(None), expected);
        assert_eq!(normalize_rules(Some(&AllocationRules::new())), expected);
    }

    #[test]
    fn test_overlay_merges_over_defaults() {
        let config = AllocationConfig {
            merge: MergeStrategy::Overlay,
            ..AllocationConfig::default()
        };
        let out = normalize_rules_with(Some(&rules(&[("Wants", 0.1), ("Debt", 0.2)])), &config);
        assert_eq!(out.len(), 4);
        assert_eq!(out["Needs"], 0.5);
        assert_eq!(out["Wants"], 0.1);
        assert_eq!(out["Debt"], 0.2);
    }
}
