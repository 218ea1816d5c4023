//! Spending analytics
//!
//! Independent computations over purchase records and numeric series:
//! aggregation, no-spend streaks, smoothing and debt payoff.

pub mod aggregate;
pub mod payoff;
pub mod smoothing;
pub mod streak;

pub use aggregate::{
    aggregate_by_category, aggregate_by_month, filter_purchases, month_summary, AggregateOptions,
    MonthSummary, MonthlyTotals, PurchaseFilter,
};
pub use payoff::{
    payoff_projection, payoff_schedule, PayoffMonth, PayoffOptions, PayoffProjection,
    PayoffStatus, DEFAULT_MAX_MONTHS,
};
pub use smoothing::moving_average;
pub use streak::{longest_no_spend_streak, purchase_dates};
