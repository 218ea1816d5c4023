//! Debt Payoff Report

use serde::Serialize;
use std::io::Write;

use crate::analytics::{
    payoff_projection, payoff_schedule, PayoffMonth, PayoffOptions, PayoffProjection, PayoffStatus,
};
use crate::display::{double_separator, format_percentage, separator};
use crate::error::{SpreadError, SpreadResult};
use crate::models::format_money;

/// Debt Payoff Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtReport {
    pub balance: f64,
    pub apr: f64,
    pub monthly_payment: f64,
    pub projection: PayoffProjection,
    pub status: PayoffStatus,
    /// Month-by-month schedule, empty unless requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<PayoffMonth>,
}

impl DebtReport {
    /// Project a payoff, optionally with the full schedule
    pub fn generate(
        balance: f64,
        apr: f64,
        monthly_payment: f64,
        options: &PayoffOptions,
        with_schedule: bool,
    ) -> Self {
        let projection = payoff_projection(balance, apr, monthly_payment, options);
        let schedule = if with_schedule {
            payoff_schedule(balance, apr, monthly_payment, options)
        } else {
            Vec::new()
        };

        Self {
            balance,
            apr,
            monthly_payment,
            status: projection.status(),
            projection,
            schedule,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        output.push_str("Debt Payoff Projection\n");
        output.push_str(&double_separator(56));
        output.push('\n');
        output.push_str(&format!("Balance:          {}\n", format_money(self.balance, symbol)));
        output.push_str(&format!("APR:              {}\n", format_percentage(self.apr)));
        output.push_str(&format!(
            "Monthly payment:  {}\n\n",
            format_money(self.monthly_payment, symbol)
        ));

        match self.status {
            PayoffStatus::Never => {
                output.push_str("The payment does not cover the monthly interest.\n");
                output.push_str("This balance will never be paid off.\n");
            }
            PayoffStatus::CapReached => {
                output.push_str(&format!(
                    "Not paid off after {} months; {} remaining.\n",
                    self.projection.months,
                    format_money(self.projection.final_balance, symbol)
                ));
                output.push_str(&format!(
                    "Interest paid so far: {}\n",
                    format_money(self.projection.interest_paid, symbol)
                ));
            }
            PayoffStatus::PaidOff => {
                output.push_str(&format!("Months to payoff: {}\n", self.projection.months));
                output.push_str(&format!(
                    "Total interest:   {}\n",
                    format_money(self.projection.interest_paid, symbol)
                ));
            }
        }

        if !self.schedule.is_empty() {
            output.push('\n');
            output.push_str(&format!(
                "{:>5} {:>14} {:>14} {:>14}\n",
                "Month", "Interest", "Payment", "Balance"
            ));
            output.push_str(&separator(56));
            output.push('\n');
            for row in &self.schedule {
                output.push_str(&format!(
                    "{:>5} {:>14} {:>14} {:>14}\n",
                    row.month,
                    format_money(row.interest, symbol),
                    format_money(row.payment, symbol),
                    format_money(row.balance, symbol)
                ));
            }
        }

        output
    }

    /// Export the schedule to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> SpreadResult<()> {
        let mut out = csv::Writer::from_writer(writer);

        out.write_record(["Month", "Interest", "Payment", "Balance"])?;
        for row in &self.schedule {
            out.write_record([
                row.month.to_string(),
                format!("{:.2}", row.interest),
                format!("{:.2}", row.payment),
                format!("{:.2}", row.balance),
            ])?;
        }

        out.flush().map_err(|e| SpreadError::Export(e.to_string()))?;
        Ok(())
    }
}
