//! Display strings for dashboard cards, variance tables and exported reports.

const NOT_AVAILABLE: &str = "N/A";

const UNITS: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Compact currency, e.g. `$1.2M`, `-$350`, `$12.5K`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}", sign, compact_magnitude(value.abs()))
}

/// Percentage from a fraction: `format_percent(0.053, 1) == "5.3%"`.
pub fn format_percent(fraction: f64, decimals: usize) -> String {
    if !fraction.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// Currency with an explicit sign for positive variances, e.g. `+$10.0K`.
pub fn format_variance(value: f64) -> String {
    if value > 0.0 && value.is_finite() {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// Same as [`format_percent`] but with an explicit `+` on positive values.
pub fn format_variance_percent(fraction: f64, decimals: usize) -> String {
    let formatted = format_percent(fraction, decimals);
    if fraction > 0.0 && fraction.is_finite() {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

fn compact_magnitude(magnitude: f64) -> String {
    for (idx, (scale, suffix)) in UNITS.iter().enumerate() {
        if magnitude >= *scale {
            let scaled = (magnitude / scale * 10.0).round() / 10.0;
            // 999_960 would otherwise print as "1000.0K".
            if scaled >= 1000.0 && idx > 0 {
                let (bigger, bigger_suffix) = UNITS[idx - 1];
                return format!("{:.1}{}", magnitude / bigger, bigger_suffix);
            }
            return format!("{:.1}{}", scaled, suffix);
        }
    }

    let rounded = magnitude.round();
    if rounded >= 1000.0 {
        return "1.0K".to_string();
    }
    format!("{:.0}", rounded)
}
