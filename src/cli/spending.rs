//! CLI commands for spending analysis
//!
//! `spending` reports one month against the smoothed monthly trend;
//! `purchases` lists the purchases that match a month or category.

use clap::Args;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::common::{export_to_file, print_report, resolve_month, OutputFormat, PurchaseArgs};
use crate::analytics::{filter_purchases, PurchaseFilter};
use crate::config::Settings;
use crate::display::{separator, truncate};
use crate::error::{SpreadError, SpreadResult};
use crate::models::{format_money, round_money, PurchaseRecord};
use crate::reports::SpendingReport;

/// Arguments of `spending`
#[derive(Args, Debug)]
pub struct SpendingArgs {
    #[command(flatten)]
    pub input: PurchaseArgs,

    /// Month to break down (YYYY-MM, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Moving-average window in months (defaults to the configured window)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Export the monthly trend to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `purchases`
#[derive(Args, Debug)]
pub struct PurchasesArgs {
    #[command(flatten)]
    pub input: PurchaseArgs,

    /// Only purchases in this month (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Only purchases in this category (case-insensitive)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Number of purchases to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Handle `spending`
pub fn handle_spending_command(
    settings: &Settings,
    args: SpendingArgs,
    format: OutputFormat,
) -> SpreadResult<()> {
    let options = settings.aggregate_options();
    let month = resolve_month(args.month.as_deref(), &options)?;
    let window = args.window.unwrap_or(settings.smoothing_window);
    let purchases = args.input.load(options.mode)?;

    let report = SpendingReport::generate(&purchases, month, window, &options)?;

    match args.output {
        Some(path) => export_to_file(&path, "Spending trend", |w| report.export_csv(w)),
        None => print_report(&report, format, || {
            report.format_terminal(&settings.currency_symbol)
        }),
    }
}

#[derive(Serialize)]
struct PurchaseListing<'a> {
    total: f64,
    count: usize,
    purchases: Vec<&'a PurchaseRecord>,
}

/// Handle `purchases`
pub fn handle_purchases_command(
    settings: &Settings,
    args: PurchasesArgs,
    format: OutputFormat,
) -> SpreadResult<()> {
    if args.limit == 0 {
        return Err(SpreadError::InvalidArgument("limit must be at least 1".into()));
    }

    let options = settings.aggregate_options();
    let filter = PurchaseFilter {
        month: args
            .month
            .as_deref()
            .map(|m| resolve_month(Some(m), &options))
            .transpose()?,
        category: args.category.clone(),
    };
    let purchases = args.input.load(options.mode)?;

    let matched = filter_purchases(&purchases, &filter, &options)?;
    let count = matched.len();
    let categories = matched
        .iter()
        .map(|p| p.category_label())
        .collect::<BTreeSet<_>>()
        .len();
    let total = round_money(matched.iter().map(|p| p.amount).sum());
    let listing = PurchaseListing {
        total,
        count,
        purchases: matched.into_iter().take(args.limit).collect(),
    };

    print_report(&listing, format, || {
        let symbol = &settings.currency_symbol;
        let mut output = String::new();

        output.push_str(&format!(
            "{:<20} {:<20} {:>12}  {}\n",
            "Date", "Category", "Amount", "Note"
        ));
        output.push_str(&separator(72));
        output.push('\n');
        for p in &listing.purchases {
            let when = p
                .occurred_at
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<20} {:<20} {:>12}  {}\n",
                truncate(&when, 20),
                truncate(p.category_label(), 20),
                format_money(p.amount, symbol),
                p.note.as_deref().unwrap_or("")
            ));
        }
        output.push_str(&separator(72));
        output.push('\n');

        if count > listing.purchases.len() {
            output.push_str(&format!(
                "Showing {} of {} purchases\n",
                listing.purchases.len(),
                count
            ));
        }
        output.push_str(&format!(
            "Total: {} across {} purchases in {} categories",
            format_money(total, symbol),
            count,
            categories
        ));
        output
    })
}
