//! Core data models for SpreadSaver
//!
//! This module contains the value shapes the engine computes over: amounts,
//! month keys, purchase records and allocation rules.

pub mod amount;
pub mod month;
pub mod purchase;
pub mod rules;

pub use amount::{format_money, parse_amount, round_money, round_to, to_float, CoercionMode};
pub use month::MonthKey;
pub use purchase::{month_key, PurchaseRecord, Timestamp, UNKNOWN_CATEGORY};
pub use rules::{AllocationConfig, AllocationRules, MergeStrategy, Weight, UNALLOCATED};

/// Category label → dollar amount, ordered by label
pub type CategoryTotals = std::collections::BTreeMap<String, f64>;
