//! CLI command for debt payoff projection

use clap::Args;
use std::path::PathBuf;

use super::common::{export_to_file, print_report, OutputFormat};
use crate::config::Settings;
use crate::error::{SpreadError, SpreadResult};
use crate::reports::DebtReport;

/// Arguments of `payoff`
#[derive(Args, Debug)]
pub struct PayoffArgs {
    /// Current balance
    #[arg(short, long, allow_negative_numbers = true)]
    pub balance: f64,

    /// Annual interest rate as a fraction (0.18 for 18%)
    #[arg(short, long)]
    pub apr: f64,

    /// Fixed monthly payment
    #[arg(short, long)]
    pub payment: f64,

    /// Stop projecting after this many months (defaults to the configured cap)
    #[arg(long)]
    pub max_months: Option<u32>,

    /// Print the month-by-month schedule
    #[arg(short, long)]
    pub schedule: bool,

    /// Export the schedule to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `payoff`
pub fn handle_payoff_command(
    settings: &Settings,
    args: PayoffArgs,
    format: OutputFormat,
) -> SpreadResult<()> {
    let mut options = settings.payoff_options();
    if let Some(max) = args.max_months {
        if max == 0 {
            return Err(SpreadError::InvalidArgument("max-months must be at least 1".into()));
        }
        options.max_months = max;
    }

    let with_schedule = args.schedule || args.output.is_some();
    let report = DebtReport::generate(
        args.balance,
        args.apr,
        args.payment,
        &options,
        with_schedule,
    );

    match args.output {
        Some(path) => export_to_file(&path, "Payoff schedule", |w| report.export_csv(w)),
        None => print_report(&report, format, || {
            report.format_terminal(&settings.currency_symbol)
        }),
    }
}
