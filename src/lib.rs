//! SpreadSaver - budget allocation and compliance engine
//!
//! This library splits an income across budget categories, compares logged
//! purchases against that plan, and runs a handful of spending analytics
//! over purchase history.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data types (purchases, allocation rules, months, amounts)
//! - `budget`: Rule normalization, income allocation and compliance
//! - `analytics`: Aggregation, no-spend streaks, smoothing and debt payoff
//! - `import`: Reading purchase records from CSV and JSON
//! - `reports`: Terminal and CSV renderings of the above
//! - `config`: Settings and path management
//! - `error`: Custom error types
//! - `cli`: Command handlers for the `spreadsaver` binary
//!
//! Every computation is a pure function over its inputs. Tunables that would
//! otherwise be global (default rules, coercion policy, iteration caps) are
//! passed in through option structs built from [`config::Settings`].
//!
//! # Example
//!
//! ```rust
//! use spreadsaver::budget::allocate_budget;
//!
//! let plan = allocate_budget(1000.0, None);
//! assert_eq!(plan.get("Needs"), Some(500.0));
//! assert_eq!(plan.total(), 1000.0);
//! ```

pub mod analytics;
pub mod budget;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod import;
pub mod models;
pub mod reports;

pub use error::{SpreadError, SpreadResult};
