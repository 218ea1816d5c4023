//! Report formatting utilities for terminal output
//!
//! Plain-text helpers shared by the budget, spending and debt reports.

/// Format a ratio (1.0 = 100%) as a percentage
///
/// Small shares keep more decimals so they don't collapse to `0%`.
pub fn format_percentage(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "n/a".to_string();
    }

    let pct = ratio * 100.0;
    let magnitude = pct.abs();
    if magnitude > 0.0 && magnitude < 0.1 {
        format!("{:.2}%", pct)
    } else if magnitude < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar of `width` cells, filled in proportion to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 || !value.is_finite() {
        return " ".repeat(width);
    }

    let filled = ((value / max_value).min(1.0) * width as f64).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

fn rule(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

pub fn separator(width: usize) -> String {
    rule('─', width)
}

pub fn double_separator(width: usize) -> String {
    rule('═', width)
}

/// Shorten `s` to at most `max_len` characters, ending in `...` when cut
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.extend(std::iter::repeat('.').take(max_len - keep));
    out
}
