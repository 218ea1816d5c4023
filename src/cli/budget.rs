//! CLI commands for budget allocation and compliance
//!
//! `allocate` splits an income across categories; `compliance` does the same
//! and then compares the split with one month of purchases.

use clap::Args;
use std::path::PathBuf;

use super::common::{
    export_to_file, parse_rules, print_report, resolve_month, OutputFormat, PurchaseArgs,
};
use crate::config::Settings;
use crate::error::SpreadResult;
use crate::reports::BudgetPlanReport;

/// Arguments of `allocate`
#[derive(Args, Debug)]
pub struct AllocateArgs {
    /// Monthly income to allocate
    #[arg(allow_negative_numbers = true)]
    pub income: f64,

    /// Allocation rule as NAME=WEIGHT, e.g. Rent=40% (repeatable)
    #[arg(short, long = "rule", value_name = "NAME=WEIGHT")]
    pub rules: Vec<String>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `compliance`
#[derive(Args, Debug)]
pub struct ComplianceArgs {
    /// Monthly income the plan is based on
    #[arg(allow_negative_numbers = true)]
    pub income: f64,

    #[command(flatten)]
    pub input: PurchaseArgs,

    /// Month to compare (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Allocation rule as NAME=WEIGHT (repeatable)
    #[arg(short, long = "rule", value_name = "NAME=WEIGHT")]
    pub rules: Vec<String>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `allocate`
pub fn handle_allocate_command(
    settings: &Settings,
    args: AllocateArgs,
    format: OutputFormat,
) -> SpreadResult<()> {
    let config = settings.allocation_config()?;
    let rules = parse_rules(&args.rules)?;

    let report = BudgetPlanReport::plan(args.income, rules.as_ref(), &config);

    match args.output {
        Some(path) => export_to_file(&path, "Budget plan", |w| report.export_csv(w)),
        None => print_report(&report, format, || {
            report.format_terminal(&settings.currency_symbol)
        }),
    }
}

/// Handle `compliance`
pub fn handle_compliance_command(
    settings: &Settings,
    args: ComplianceArgs,
    format: OutputFormat,
) -> SpreadResult<()> {
    let config = settings.allocation_config()?;
    let options = settings.aggregate_options();
    let rules = parse_rules(&args.rules)?;
    let month = resolve_month(args.month.as_deref(), &options)?;
    let purchases = args.input.load(options.mode)?;

    let report = BudgetPlanReport::generate(
        args.income,
        rules.as_ref(),
        &config,
        &purchases,
        month,
        &options,
    )?;

    match args.output {
        Some(path) => export_to_file(&path, "Compliance report", |w| report.export_csv(w)),
        None => print_report(&report, format, || {
            report.format_terminal(&settings.currency_symbol)
        }),
    }
}
