//! Trailing moving averages

use crate::error::{SpreadError, SpreadResult};
use crate::models::{round_to, to_float};

/// Trailing moving average with a partial head
///
/// Output `i` is the mean of the last `window` values ending at `i`; the
/// first `window - 1` outputs average over however many values exist so far.
/// Runs in O(n) with a running sum. Outputs are rounded to 4 places.
///
/// # Errors
///
/// Returns [`SpreadError::InvalidArgument`] when `window` is 0.
pub fn moving_average(values: &[f64], window: usize) -> SpreadResult<Vec<f64>> {
    if window == 0 {
        return Err(SpreadError::InvalidArgument("window must be > 0".into()));
    }

    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;

    for (i, value) in values.iter().enumerate() {
        acc += to_float(Some(*value));
        if i >= window {
            acc -= to_float(Some(values[i - window]));
        }
        let count = (i + 1).min(window);
        out.push(round_to(acc / count as f64, 4));
    }

    Ok(out)
}
