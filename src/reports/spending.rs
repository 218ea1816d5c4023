//! Spending Report
//!
//! Month-by-month spending with a smoothed trend, the category breakdown of
//! one month, and the longest no-spend streak.

use serde::Serialize;
use std::io::Write;

use crate::analytics::{
    aggregate_by_month, longest_no_spend_streak, month_summary, moving_average, purchase_dates,
    AggregateOptions, MonthSummary, MonthlyTotals,
};
use crate::display::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::error::{SpreadError, SpreadResult};
use crate::models::{format_money, MonthKey, PurchaseRecord};

/// One month of the spending trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: MonthKey,
    pub total: f64,
    /// Trailing moving average ending at this month
    pub average: f64,
}

/// Spending Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingReport {
    /// Breakdown of the focus month
    pub summary: MonthSummary,
    /// Totals for every month with purchases, oldest first
    pub trend: Vec<TrendPoint>,
    /// Moving-average window used for the trend
    pub window: usize,
    /// Longest run of days without purchases between two purchase days
    pub longest_no_spend_streak: i64,
}

impl SpendingReport {
    /// Generate a spending report focused on `month`
    ///
    /// # Errors
    ///
    /// Fails on a zero `window`, or on bad timestamps in strict mode.
    pub fn generate(
        purchases: &[PurchaseRecord],
        month: MonthKey,
        window: usize,
        options: &AggregateOptions,
    ) -> SpreadResult<Self> {
        let summary = month_summary(purchases, month, options)?;

        let monthly = contiguous(aggregate_by_month(purchases, options)?);
        let totals: Vec<f64> = monthly.iter().map(|(_, total)| *total).collect();
        let averages = moving_average(&totals, window)?;
        let trend = monthly
            .into_iter()
            .zip(averages)
            .map(|((month, total), average)| TrendPoint {
                month,
                total,
                average,
            })
            .collect();

        let longest_no_spend_streak = longest_no_spend_streak(purchase_dates(purchases, options)?);

        Ok(Self {
            summary,
            trend,
            window,
            longest_no_spend_streak,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}\n", self.summary.month));
        output.push_str(&double_separator(64));
        output.push('\n');
        output.push_str(&format!(
            "Total Spent: {}\n",
            format_money(self.summary.total_spent, symbol)
        ));
        output.push_str(&format!("Purchases: {}\n", self.summary.purchase_count));
        output.push_str(&format!(
            "Longest no-spend streak: {} days\n\n",
            self.longest_no_spend_streak
        ));

        output.push_str(&format!("{:<28} {:>12} {:>8}\n", "Category", "Amount", "%"));
        output.push_str(&separator(64));
        output.push('\n');

        let mut categories: Vec<(&String, &f64)> = self.summary.by_category.iter().collect();
        categories.sort_by(|a, b| b.1.total_cmp(a.1));
        for (category, amount) in categories {
            let share = if self.summary.total_spent > 0.0 {
                amount / self.summary.total_spent
            } else {
                0.0
            };
            output.push_str(&format!(
                "{:<28} {:>12} {:>8}\n",
                truncate(category, 28),
                format_money(*amount, symbol),
                format_percentage(share)
            ));
        }

        if !self.trend.is_empty() {
            output.push_str(&format!("\nMonthly trend ({}-month average)\n", self.window));
            output.push_str(&separator(64));
            output.push('\n');

            let max_total = self.trend.iter().map(|p| p.total).fold(0.0, f64::max);
            for point in &self.trend {
                output.push_str(&format!(
                    "{}  {:>12} {:>12}  {}\n",
                    point.month,
                    format_money(point.total, symbol),
                    format_money(point.average, symbol),
                    format_bar(point.total, max_total, 20)
                ));
            }
        }

        output
    }

    /// Export the monthly trend to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> SpreadResult<()> {
        let mut out = csv::Writer::from_writer(writer);

        out.write_record(["Month", "Total", "Moving Average"])?;
        for point in &self.trend {
            out.write_record([
                point.month.to_string(),
                format!("{:.2}", point.total),
                format!("{:.4}", point.average),
            ])?;
        }

        out.flush().map_err(|e| SpreadError::Export(e.to_string()))?;
        Ok(())
    }
}

/// Every month from the first to the last key, with 0.0 for months without purchases
fn contiguous(monthly: MonthlyTotals) -> Vec<(MonthKey, f64)> {
    let (first, last) = match (monthly.keys().next(), monthly.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let mut months = Vec::new();
    let mut month = first;
    while month <= last {
        months.push((month, monthly.get(&month).copied().unwrap_or(0.0)));
        month = month.next();
    }
    months
}
