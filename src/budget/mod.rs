//! Budget allocation and compliance
//!
//! - `normalize`: allocation rules → fractional weights
//! - `allocate`: income → per-category dollar amounts
//! - `compliance`: planned vs. actual comparison

pub mod allocate;
pub mod compliance;
pub mod normalize;

pub use allocate::{allocate_budget, allocate_budget_with, MonthlyAllocation};
pub use compliance::{compliance_report, ComplianceResult, COMPLIANCE_RATIO_CAP};
pub use normalize::{normalize_rules, normalize_rules_with, NormalizedRules};
