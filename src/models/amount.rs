//! Amount coercion and rounding primitives
//!
//! Amounts are plain `f64` dollars. Every value leaving the engine is rounded
//! to cents with [`round_money`]; every value entering it goes through
//! [`to_float`] or [`parse_amount`] so missing or malformed input never poisons
//! a total.

use serde::{Deserialize, Serialize};

use crate::error::{SpreadError, SpreadResult};

/// How malformed numeric or date input is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Replace bad input with a safe default (0.0, or the current time for dates)
    #[default]
    Lenient,
    /// Reject bad input with [`SpreadError::Coercion`]
    Strict,
}

impl CoercionMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Coerce an optional number to a finite `f64`
///
/// `None`, NaN and infinities all become `0.0`.
///
/// # Examples
/// ```
/// use spreadsaver::models::to_float;
/// assert_eq!(to_float(Some(12.5)), 12.5);
/// assert_eq!(to_float(None), 0.0);
/// assert_eq!(to_float(Some(f64::NAN)), 0.0);
/// ```
pub fn to_float(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Round to a fixed number of decimal places, half away from zero
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 so outputs compare and print cleanly
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round a dollar amount to cents
pub fn round_money(value: f64) -> f64 {
    round_to(value, 2)
}

/// Parse a textual amount
///
/// Accepts formats: "10.50", "-10.50", "$10.50", "1,234.56", "10".
/// Blank or unparsable text becomes `0.0` in lenient mode and a coercion
/// error in strict mode.
pub fn parse_amount(s: &str, mode: CoercionMode) -> SpreadResult<f64> {
    let trimmed = s.trim();

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(if negative { -v } else { v }),
        _ if mode.is_strict() => Err(SpreadError::bad_amount(s)),
        _ => {
            if !trimmed.is_empty() {
                tracing::warn!(value = s, "unparsable amount coerced to 0.0");
            }
            Ok(0.0)
        }
    }
}

/// Format an amount with a currency symbol, e.g. `$1234.50` or `-$3.20`
pub fn format_money(amount: f64, symbol: &str) -> String {
    let amount = round_money(amount);
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, amount.abs())
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}
