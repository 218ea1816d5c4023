//! Reports module for SpreadSaver
//!
//! Provides the budget plan, spending and debt payoff reports, each with
//! terminal formatting and CSV export.

pub mod budget_plan;
pub mod debt;
pub mod spending;

pub use budget_plan::{BudgetPlanReport, PlanRow};
pub use debt::DebtReport;
pub use spending::{SpendingReport, TrendPoint};
