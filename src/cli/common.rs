//! Arguments and output plumbing shared by the command handlers

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::analytics::AggregateOptions;
use crate::error::{SpreadError, SpreadResult};
use crate::import::FieldMapping;
use crate::models::{AllocationRules, CoercionMode, MonthKey, PurchaseRecord};

/// How results are printed to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Where to read purchases from, and which fields hold what
#[derive(Args, Debug, Clone)]
pub struct PurchaseArgs {
    /// Purchase file (.csv with a header row, or a JSON array of objects)
    #[arg(short, long, value_name = "FILE")]
    pub purchases: PathBuf,

    /// Field holding the category
    #[arg(long, default_value = "category")]
    pub category_field: String,

    /// Field holding the amount
    #[arg(long, default_value = "amount")]
    pub amount_field: String,

    /// Field holding the purchase date
    #[arg(long, default_value = "occurred_at")]
    pub date_field: String,
}

impl PurchaseArgs {
    pub fn mapping(&self) -> FieldMapping {
        FieldMapping {
            category_field: self.category_field.clone(),
            amount_field: self.amount_field.clone(),
            date_field: self.date_field.clone(),
            ..FieldMapping::default()
        }
    }

    /// Read every purchase from the file
    pub fn load(&self, mode: CoercionMode) -> SpreadResult<Vec<PurchaseRecord>> {
        let purchases = self.mapping().read_file(&self.purchases, mode)?;
        tracing::debug!(
            file = %self.purchases.display(),
            count = purchases.len(),
            "loaded purchases"
        );
        Ok(purchases)
    }
}

/// Build caller rules from `NAME=WEIGHT` specs; no specs means "use defaults"
pub fn parse_rules(specs: &[String]) -> SpreadResult<Option<AllocationRules>> {
    if specs.is_empty() {
        return Ok(None);
    }

    let mut rules = AllocationRules::new();
    for spec in specs {
        rules.insert_spec(spec)?;
    }
    Ok(Some(rules))
}

/// The requested month, or the month of `options.now`
pub fn resolve_month(month: Option<&str>, options: &AggregateOptions) -> SpreadResult<MonthKey> {
    match month {
        Some(s) => MonthKey::parse_or_current(s, options.mode, options.now.date()),
        None => Ok(MonthKey::from_datetime(options.now)),
    }
}

/// Print a report in the requested format
pub fn print_report<T, F>(report: &T, format: OutputFormat, text: F) -> SpreadResult<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
    }
    Ok(())
}

/// Create `path` and hand a buffered writer to `export`
pub fn export_to_file<F>(path: &Path, what: &str, export: F) -> SpreadResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> SpreadResult<()>,
{
    let file = File::create(path).map_err(|e| {
        SpreadError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    println!("{} exported to: {}", what, path.display());
    Ok(())
}
