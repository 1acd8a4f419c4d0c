//! Text formatting for prices, percentages and generated update copy.
//!
//! Kept apart from the classifier so sentiment derivation never depends on
//! how numbers are rendered.

use crate::market::Sentiment;

/// Placeholder for values the data source did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum fraction digits used for grouped large numbers.
const GROUPED_MAX_DECIMALS: usize = 3;

/// Render a number the way it arrived: shortest text that round-trips.
pub fn raw_number(value: f64) -> String {
    if value == 0.0 {
        // no "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Render a number with thousands separators and at most three fraction
/// digits, trailing zeros trimmed (`1234567.8912` -> `1,234,567.891`).
pub fn grouped(value: f64) -> String {
    group_digits(value, GROUPED_MAX_DECIMALS, true)
}

/// Dollar amount with exactly two decimals and no grouping (`$3.10`).
pub fn usd(value: f64) -> String {
    dollars(Some(value), |v| format!("{:.2}", v))
}

/// Dollar amount with thousands separators (`$1,234,567`).
pub fn usd_grouped(value: f64) -> String {
    dollars(Some(value), grouped)
}

/// Percentage change with an explicit `+` on gains (`+1.23%`, `-4.50%`).
pub fn signed_percent(change: Option<f64>) -> String {
    match change {
        // Rounds to zero; no sign either way.
        Some(c) if c.abs() < 0.005 => "0.00%".to_string(),
        Some(c) if c.is_finite() && c > 0.0 => format!("+{:.2}%", c),
        Some(c) if c.is_finite() => format!("{:.2}%", c),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Generated headline for a market update.
pub fn headline(sentiment: Sentiment, name: &str, change: Option<f64>, price: Option<f64>) -> String {
    let change = change.unwrap_or_default();
    match sentiment {
        Sentiment::Hot => format!("{} surges {:.2}% in 24 hours", name, change),
        Sentiment::Cold => format!("{} drops {:.2}% in 24 hours", name, change.abs()),
        Sentiment::Medium => format!(
            "{} shows stable movement at {}",
            name,
            dollars(price, raw_number)
        ),
    }
}

/// Price, market cap and volume summary for a market update.
pub fn description(price: Option<f64>, market_cap: Option<f64>, volume: Option<f64>) -> String {
    format!(
        "Current price: {}. Market Cap: {}. 24h Volume: {}",
        dollars(price, raw_number),
        dollars(market_cap, grouped),
        dollars(volume, grouped)
    )
}

/// `$` plus the rendered value, or a bare `N/A` when there is no finite value.
fn dollars(value: Option<f64>, render: fn(f64) -> String) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("${}", render(v)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn group_digits(value: f64, decimals: usize, trim: bool) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let formatted = format!("{:.1$}", value.abs(), decimals);
    let (integer_part, fraction_part) = match formatted.split_once('.') {
        Some((int, frac)) if trim => (int, frac.trim_end_matches('0')),
        Some((int, frac)) => (int, frac),
        None => (formatted.as_str(), ""),
    };

    let mut out = String::with_capacity(formatted.len() + formatted.len() / 3 + 1);
    // Suppress the sign when rounding produced zero.
    if value < 0.0 && formatted.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }

    let len = integer_part.len();
    for (i, ch) in integer_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if !fraction_part.is_empty() {
        out.push('.');
        out.push_str(fraction_part);
    }

    out
}
