//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the reports and analytics.

pub mod budget;
pub mod common;
pub mod payoff;
pub mod spending;

pub use budget::{handle_allocate_command, handle_compliance_command, AllocateArgs, ComplianceArgs};
pub use common::{OutputFormat, PurchaseArgs};
pub use payoff::{handle_payoff_command, PayoffArgs};
pub use spending::{handle_purchases_command, handle_spending_command, PurchasesArgs, SpendingArgs};
