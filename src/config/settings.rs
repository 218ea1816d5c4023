//! User settings for SpreadSaver
//!
//! Every tunable the engine would otherwise hard-code (default split,
//! coercion policy, payoff iteration cap) lives here and is turned into the
//! explicit option structs each computation takes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::paths::SpreadPaths;
use crate::analytics::{AggregateOptions, PayoffOptions, DEFAULT_MAX_MONTHS};
use crate::error::{SpreadError, SpreadResult};
use crate::models::{
    AllocationConfig, AllocationRules, CoercionMode, MergeStrategy, Weight, UNALLOCATED,
};

/// User settings for SpreadSaver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default allocation split, category → fraction of income
    #[serde(default = "default_rules")]
    pub default_rules: BTreeMap<String, f64>,

    /// How caller rules combine with `default_rules`
    #[serde(default)]
    pub merge_strategy: MergeStrategy,

    /// Bucket that receives unassigned income
    #[serde(default = "default_unallocated_label")]
    pub unallocated_label: String,

    /// Strict or lenient input coercion
    #[serde(default)]
    pub coercion_mode: CoercionMode,

    /// Iteration cap for payoff projections
    #[serde(default = "default_payoff_max_months")]
    pub payoff_max_months: u32,

    /// Window of the spending trend moving average
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_rules() -> BTreeMap<String, f64> {
    [("Needs", 0.5), ("Wants", 0.3), ("Savings", 0.2)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn default_unallocated_label() -> String {
    UNALLOCATED.to_string()
}

fn default_payoff_max_months() -> u32 {
    DEFAULT_MAX_MONTHS
}

fn default_smoothing_window() -> usize {
    3
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_rules: default_rules(),
            merge_strategy: MergeStrategy::default(),
            unallocated_label: default_unallocated_label(),
            coercion_mode: CoercionMode::default(),
            payoff_max_months: default_payoff_max_months(),
            smoothing_window: default_smoothing_window(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &SpreadPaths) -> Result<Self, SpreadError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SpreadError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SpreadError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            tracing::debug!(path = %settings_path.display(), "loaded settings");
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SpreadPaths) -> Result<(), SpreadError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SpreadError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| SpreadError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Allocation parameters built from these settings
    ///
    /// # Errors
    ///
    /// Returns a validation error if a default rule or the unallocated
    /// label is blank.
    pub fn allocation_config(&self) -> SpreadResult<AllocationConfig> {
        let mut defaults = AllocationRules::new();
        for (label, fraction) in &self.default_rules {
            defaults.insert(label.as_str(), Weight::Fraction(*fraction))?;
        }

        let unallocated_label = self.unallocated_label.trim();
        if unallocated_label.is_empty() {
            return Err(SpreadError::Config("unallocated_label cannot be empty".into()));
        }

        Ok(AllocationConfig {
            defaults,
            merge: self.merge_strategy,
            unallocated_label: unallocated_label.to_string(),
        })
    }

    /// Aggregation parameters, stamped with the current time
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions::new(self.coercion_mode)
    }

    /// Payoff simulation parameters
    pub fn payoff_options(&self) -> PayoffOptions {
        PayoffOptions {
            max_months: self.payoff_max_months,
        }
    }
}
