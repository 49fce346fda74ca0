//! Display formatting for dashboard values.

/// Placeholder shown for any value that could not be fetched.
pub const MISSING: &str = "--";

/// Format a price for the ticker row.
///
/// BTC pairs are shown as whole numbers with thousands separators; every other
/// pair keeps four decimals.
pub fn format_price(name: &str, price: Option<f64>) -> String {
    match price {
        None => MISSING.to_string(),
        Some(p) if !p.is_finite() => MISSING.to_string(),
        Some(p) if name.contains("BTC") => group_thousands(p.round()),
        Some(p) => format!("{:.4}", p),
    }
}

/// Format a percentage change with an explicit sign, e.g. `+1.25%`.
pub fn format_change(change: f64) -> String {
    format!("{:+.2}%", change)
}

/// Percent change from `previous` to `current`. Zero when there is no
/// reference price.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 && digits != "0" {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
