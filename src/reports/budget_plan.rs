//! Budget Plan Report
//!
//! Shows how an income is allocated across categories and, when actual
//! purchases are supplied, how spending compares with that plan.

use serde::Serialize;
use std::io::Write;

use crate::analytics::{month_summary, AggregateOptions};
use crate::budget::{allocate_budget_with, compliance_report, ComplianceResult, MonthlyAllocation};
use crate::display::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::error::{SpreadError, SpreadResult};
use crate::models::{
    format_money, AllocationConfig, AllocationRules, CategoryTotals, MonthKey, PurchaseRecord,
};

/// One category line of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRow {
    pub category: String,
    pub planned: f64,
    pub actual: Option<f64>,
}

/// Budget Plan Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlanReport {
    /// Income that was allocated
    pub income: f64,
    /// Month the actuals were drawn from
    pub month: Option<MonthKey>,
    /// Allocation of the income
    pub allocation: MonthlyAllocation,
    /// Actual spending per category, if purchases were given
    pub actual: Option<CategoryTotals>,
    /// Planned vs. actual comparison, if purchases were given
    pub compliance: Option<ComplianceResult>,
}

impl BudgetPlanReport {
    /// Allocate an income without comparing against spending
    pub fn plan(income: f64, rules: Option<&AllocationRules>, config: &AllocationConfig) -> Self {
        Self {
            income,
            month: None,
            allocation: allocate_budget_with(income, rules, config),
            actual: None,
            compliance: None,
        }
    }

    /// Allocate an income and compare it with the purchases of one month
    pub fn generate(
        income: f64,
        rules: Option<&AllocationRules>,
        config: &AllocationConfig,
        purchases: &[PurchaseRecord],
        month: MonthKey,
        options: &AggregateOptions,
    ) -> SpreadResult<Self> {
        let allocation = allocate_budget_with(income, rules, config);
        let summary = month_summary(purchases, month, options)?;
        let compliance = compliance_report(allocation.as_totals(), &summary.by_category);

        Ok(Self {
            income,
            month: Some(month),
            allocation,
            actual: Some(summary.by_category),
            compliance: Some(compliance),
        })
    }

    /// One row per category on either side, planned categories first
    pub fn rows(&self) -> Vec<PlanRow> {
        let mut rows: Vec<PlanRow> = self
            .allocation
            .iter()
            .map(|(category, planned)| PlanRow {
                category: category.to_string(),
                planned,
                actual: self
                    .actual
                    .as_ref()
                    .map(|a| a.get(category).copied().unwrap_or(0.0)),
            })
            .collect();

        if let Some(actual) = &self.actual {
            for (category, spent) in actual {
                if self.allocation.get(category).is_none() {
                    rows.push(PlanRow {
                        category: category.clone(),
                        planned: 0.0,
                        actual: Some(*spent),
                    });
                }
            }
        }

        rows
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();

        match self.month {
            Some(month) => output.push_str(&format!("Budget Plan: {}\n", month)),
            None => output.push_str("Budget Plan\n"),
        }
        output.push_str(&double_separator(72));
        output.push('\n');
        output.push_str(&format!("Income: {}\n\n", format_money(self.income.max(0.0), symbol)));

        let rows = self.rows();
        let max_planned = rows.iter().map(|r| r.planned).fold(0.0, f64::max);

        if self.actual.is_some() {
            output.push_str(&format!(
                "{:<24} {:>12} {:>12} {:>12}\n",
                "Category", "Planned", "Actual", "Difference"
            ));
        } else {
            output.push_str(&format!("{:<24} {:>12}  {}\n", "Category", "Planned", "Share"));
        }
        output.push_str(&separator(72));
        output.push('\n');

        for row in &rows {
            let name = truncate(&row.category, 24);
            match row.actual {
                Some(actual) => output.push_str(&format!(
                    "{:<24} {:>12} {:>12} {:>12}\n",
                    name,
                    format_money(row.planned, symbol),
                    format_money(actual, symbol),
                    format_money(actual - row.planned, symbol),
                )),
                None => output.push_str(&format!(
                    "{:<24} {:>12}  {}\n",
                    name,
                    format_money(row.planned, symbol),
                    format_bar(row.planned, max_planned, 20),
                )),
            }
        }

        if let Some(compliance) = &self.compliance {
            output.push_str(&separator(72));
            output.push('\n');
            output.push_str(&format!(
                "{:<24} {:>12} {:>12}\n",
                "TOTAL",
                format_money(compliance.total_planned, symbol),
                format_money(compliance.total_actual, symbol),
            ));
            output.push_str(&format!(
                "\nCompliance: {} of plan spent",
                format_percentage(compliance.compliance_ratio)
            ));
            if compliance.is_within_plan() {
                output.push_str(" (within budget)\n");
            } else {
                output.push_str(" (over budget)\n");
            }

            if !compliance.overruns.is_empty() {
                output.push_str("\nOverruns:\n");
                for (category, amount) in &compliance.overruns {
                    output.push_str(&format!(
                        "  {:<22} {:>12}\n",
                        truncate(category, 22),
                        format_money(*amount, symbol)
                    ));
                }
            }
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> SpreadResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let month = self.month.map(|m| m.to_string()).unwrap_or_default();

        csv.write_record(["Month", "Category", "Planned", "Actual", "Difference"])?;
        for row in self.rows() {
            let (actual, difference) = match row.actual {
                Some(a) => (format!("{:.2}", a), format!("{:.2}", a - row.planned)),
                None => (String::new(), String::new()),
            };
            csv.write_record([
                month.clone(),
                row.category,
                format!("{:.2}", row.planned),
                actual,
                difference,
            ])?;
        }

        csv.flush().map_err(|e| SpreadError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoercionMode;
    use chrono::NaiveDate;

    fn purchases() -> Vec<PurchaseRecord> {
        let day = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap();
        vec![
            PurchaseRecord::new("Needs", 450.0).on(day(2)),
            PurchaseRecord::new("Wants", 380.0).on(day(9)),
            PurchaseRecord::new("Travel", 50.0).on(day(20)),
            PurchaseRecord::new("Needs", 999.0).on(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
        ]
    }

    fn options() -> AggregateOptions {
        AggregateOptions::new(CoercionMode::Strict)
    }

    #[test]
    fn test_plan_only() {
        let report = BudgetPlanReport::plan(1000.0, None, &AllocationConfig::default());
        assert_eq!(report.rows().len(), 3);
        assert!(report.compliance.is_none());

        let text = report.format_terminal("$");
        assert!(text.contains("Income: $1000.00"));
        assert!(text.contains("Needs"));
        assert!(!text.contains("Compliance"));
    }

    #[test]
    fn test_generate_with_actuals() {
        let april = MonthKey::parse("2025-04").unwrap();
        let report = BudgetPlanReport::generate(
            1000.0,
            None,
            &AllocationConfig::default(),
            &purchases(),
            april,
            &options(),
        )
        .unwrap();

        let compliance = report.compliance.as_ref().unwrap();
        assert_eq!(compliance.total_actual, 880.0);
        assert_eq!(compliance.overruns["Wants"], 80.0);
        assert_eq!(compliance.overruns["Travel"], 50.0);
        assert_eq!(compliance.underruns["Needs"], 50.0);
        assert_eq!(compliance.underruns["Savings"], 200.0);

        let rows = report.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.last().unwrap().category, "Travel");
        assert_eq!(rows.last().unwrap().planned, 0.0);

        let text = report.format_terminal("$");
        assert!(text.contains("Budget Plan: 2025-04"));
        assert!(text.contains("within budget"));
        assert!(text.contains("Overruns:"));
    }

    #[test]
    fn test_export_csv() {
        let report = BudgetPlanReport::plan(100.0, None, &AllocationConfig::default());
        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Month,Category,Planned,Actual,Difference");
        assert_eq!(lines.len(), 4);
        assert!(lines.contains(&",Needs,50.00,,"));
    }
}
