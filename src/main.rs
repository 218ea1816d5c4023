use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spreadsaver::cli::{
    handle_allocate_command, handle_compliance_command, handle_payoff_command,
    handle_purchases_command, handle_spending_command, AllocateArgs, ComplianceArgs,
    OutputFormat, PayoffArgs, PurchasesArgs, SpendingArgs,
};
use spreadsaver::config::{paths::HOME_ENV, SpreadPaths, Settings};
use spreadsaver::models::CoercionMode;

#[derive(Parser)]
#[command(
    name = "spreadsaver",
    version,
    about = "Budget allocation, compliance and spending analytics",
    long_about = "SpreadSaver splits an income across budget categories, checks \
                  logged purchases against that plan, and analyses spending \
                  trends, no-spend streaks and debt payoff."
)]
struct Cli {
    /// Reject malformed amounts, dates and months instead of substituting defaults
    #[arg(long, global = true, env = "SPREADSAVER_STRICT")]
    strict: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an income across budget categories
    #[command(alias = "plan")]
    Allocate(AllocateArgs),

    /// Compare a month of purchases with the allocation of an income
    Compliance(ComplianceArgs),

    /// Monthly spending breakdown, trend and no-spend streak
    Spending(SpendingArgs),

    /// List purchases matching a month or category
    #[command(alias = "list")]
    Purchases(PurchasesArgs),

    /// Project how long a fixed payment takes to clear a debt
    Payoff(PayoffArgs),

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = SpreadPaths::new().context("failed to resolve the configuration directory")?;
    let mut settings = Settings::load_or_create(&paths)
        .with_context(|| format!("failed to load {}", paths.settings_file().display()))?;
    if cli.strict {
        settings.coercion_mode = CoercionMode::Strict;
    }
    tracing::debug!(mode = ?settings.coercion_mode, format = ?cli.format, "starting");

    match cli.command {
        Some(Commands::Allocate(args)) => {
            handle_allocate_command(&settings, args, cli.format).context("allocate failed")?;
        }
        Some(Commands::Compliance(args)) => {
            handle_compliance_command(&settings, args, cli.format).context("compliance failed")?;
        }
        Some(Commands::Spending(args)) => {
            handle_spending_command(&settings, args, cli.format).context("spending failed")?;
        }
        Some(Commands::Purchases(args)) => {
            handle_purchases_command(&settings, args, cli.format).context("purchases failed")?;
        }
        Some(Commands::Payoff(args)) => {
            handle_payoff_command(&settings, args, cli.format).context("payoff failed")?;
        }
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!(
                    "SpreadSaver is already initialized at: {}",
                    paths.settings_file().display()
                );
            } else {
                settings
                    .save(&paths)
                    .context("failed to write the settings file")?;
                println!("Settings written to: {}", paths.settings_file().display());
                println!();
                println!("Default allocation:");
                for (category, fraction) in &settings.default_rules {
                    println!("  {:<12} {:>5.1}%", category, fraction * 100.0);
                }
            }
        }
        Some(Commands::Config) => {
            println!("SpreadSaver Configuration");
            println!("=========================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Override with:    {}", HOME_ENV);
            println!();
            println!("Settings:");
            println!("  Merge strategy:     {:?}", settings.merge_strategy);
            println!("  Unallocated label:  {}", settings.unallocated_label);
            println!("  Coercion mode:      {:?}", settings.coercion_mode);
            println!("  Payoff max months:  {}", settings.payoff_max_months);
            println!("  Smoothing window:   {}", settings.smoothing_window);
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Default rules:");
            for (category, fraction) in &settings.default_rules {
                println!("    {:<12} {}", category, fraction);
            }
        }
        None => {
            println!("SpreadSaver - budget allocation and spending analytics");
            println!();
            println!("Run 'spreadsaver --help' for usage information.");
            println!("Run 'spreadsaver allocate 1000' to see the default split.");
        }
    }

    Ok(())
}
