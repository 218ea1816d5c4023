//! Allocation rules
//!
//! A rule pairs a category label with the share of income it should receive.
//! The unit of each share is carried in the [`Weight`] tag, so "1" meaning
//! "one percent" and "1" meaning "everything" never have to be guessed apart
//! unless the caller explicitly asks for inference with [`Weight::Auto`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SpreadError, SpreadResult};

/// Label of the synthetic bucket that receives unassigned income
pub const UNALLOCATED: &str = "Unallocated";

/// A share of income for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Weight {
    /// Already a fraction of income (0.5 = half)
    Fraction(f64),
    /// A percentage of income (50 = half)
    Percent(f64),
    /// Unit inferred from the other `Auto` weights in the same rule set
    Auto(f64),
}

impl Weight {
    /// The raw number regardless of unit
    pub fn raw(&self) -> f64 {
        match self {
            Self::Fraction(v) | Self::Percent(v) | Self::Auto(v) => *v,
        }
    }

    /// Parse a weight from CLI-style text
    ///
    /// `50%` is a percentage, `0.5f` a fraction, and a bare number is `Auto`.
    pub fn parse(s: &str) -> SpreadResult<Self> {
        let s = s.trim();
        let number = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SpreadError::Validation(format!("Invalid weight '{}'", s)))
        };

        if let Some(pct) = s.strip_suffix('%') {
            Ok(Self::Percent(number(pct)?))
        } else if let Some(frac) = s.strip_suffix('f') {
            Ok(Self::Fraction(number(frac)?))
        } else {
            Ok(Self::Auto(number(s)?))
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fraction(v) => write!(f, "{}f", v),
            Self::Percent(v) => write!(f, "{}%", v),
            Self::Auto(v) => write!(f, "{}", v),
        }
    }
}

/// How caller rules combine with the configured defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Non-empty caller rules replace the defaults entirely
    #[default]
    Replace,
    /// Caller rules are laid over the defaults, winning per key
    Overlay,
}

/// An ordered set of allocation rules keyed by category label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationRules(BTreeMap<String, Weight>);

impl AllocationRules {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// The 50/30/20 split
    pub fn fifty_thirty_twenty() -> Self {
        let mut rules = Self::new();
        rules.0.insert("Needs".into(), Weight::Fraction(0.5));
        rules.0.insert("Wants".into(), Weight::Fraction(0.3));
        rules.0.insert("Savings".into(), Weight::Fraction(0.2));
        rules
    }

    /// Build a rule set of `Auto` weights
    pub fn from_weights<I, K>(weights: I) -> SpreadResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut rules = Self::new();
        for (label, value) in weights {
            rules.insert(label, Weight::Auto(value))?;
        }
        Ok(rules)
    }

    /// Add or replace a rule
    ///
    /// # Errors
    ///
    /// Returns a validation error if the label is empty or whitespace.
    pub fn insert(&mut self, label: impl Into<String>, weight: Weight) -> SpreadResult<()> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(SpreadError::Validation(
                "Category label cannot be empty".into(),
            ));
        }
        self.0.insert(trimmed.to_string(), weight);
        Ok(())
    }

    /// Parse a `NAME=WEIGHT` rule and add it
    pub fn insert_spec(&mut self, spec: &str) -> SpreadResult<()> {
        let (label, weight) = spec.rsplit_once('=').ok_or_else(|| {
            SpreadError::Validation(format!("Invalid rule '{}'. Use NAME=WEIGHT", spec))
        })?;
        self.insert(label, Weight::parse(weight)?)
    }

    pub fn get(&self, label: &str) -> Option<&Weight> {
        self.0.get(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Weight)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parameters of the rule normalizer and allocator
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationConfig {
    /// Rules used when the caller supplies none
    pub defaults: AllocationRules,
    /// How caller rules combine with `defaults`
    pub merge: MergeStrategy,
    /// Bucket that receives the remainder
    pub unallocated_label: String,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            defaults: AllocationRules::fifty_thirty_twenty(),
            merge: MergeStrategy::default(),
            unallocated_label: UNALLOCATED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_parse() {
        assert_eq!(Weight::parse("50%").unwrap(), Weight::Percent(50.0));
        assert_eq!(Weight::parse("0.25f").unwrap(), Weight::Fraction(0.25));
        assert_eq!(Weight::parse(" 30 ").unwrap(), Weight::Auto(30.0));
        assert!(Weight::parse("lots").is_err());
        assert!(Weight::parse("inf").is_err());
    }

    #[test]
    fn test_insert_rejects_empty_label() {
        let mut rules = AllocationRules::new();
        let err = rules.insert("  ", Weight::Auto(1.0)).unwrap_err();
        assert!(err.is_validation());
        assert!(rules.is_empty());
    }

    #[test]
    fn test_insert_spec() {
        let mut rules = AllocationRules::new();
        rules.insert_spec("Rent=40%").unwrap();
        rules.insert_spec("Fun Money=0.1f").unwrap();
        assert_eq!(rules.get("Rent"), Some(&Weight::Percent(40.0)));
        assert_eq!(rules.get("Fun Money"), Some(&Weight::Fraction(0.1)));
        assert!(rules.insert_spec("Rent").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = AllocationConfig::default();
        assert_eq!(config.defaults.len(), 3);
        assert_eq!(config.merge, MergeStrategy::Replace);
        assert_eq!(config.unallocated_label, "Unallocated");
    }

    #[test]
    fn test_serde_shape() {
        let rules = AllocationRules::from_weights([("Food", 40.0)]).unwrap();
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(json, r#"{"Food":{"unit":"auto","value":40.0}}"#);
    }
}
