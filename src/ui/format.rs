// ---------------------------------------------------------------------------
// Display formatting for amounts, ratios and counts
// ---------------------------------------------------------------------------

/// Shown wherever a value is undefined (NaN or zero denominator).
pub const UNDEFINED: &str = "n/a";

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounded to a whole number with thousands separators.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}{}", group_digits(&rounded))
}

pub fn count(n: usize) -> String {
    group_digits(&n.to_string())
}

/// `1500000.0` → `"Rp 1,500,000"`.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("Rp {}", thousands(value))
}

/// A 0..1 ratio as a percentage: `0.805` → `"80.5%"`.
pub fn ratio(value: f64) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{:.1}%", value * 100.0)
}

/// An already-scaled percentage, `None` when undefined.
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => UNDEFINED.to_string(),
    }
}
