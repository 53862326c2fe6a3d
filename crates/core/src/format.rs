//! Display formatting helpers for prices, large quantities and percentages.
//! Pure functions; missing upstream values render as "N/A".

/// Format a number with comma thousands separators at a fixed precision.
#[must_use]
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.prec$}", value, prec = decimals);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();

    match decimal_part {
        Some(d) => format!("{sign}{grouped}.{d}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Dollar price: two decimals with separators for $1 and up, six decimals
/// below that so micro-cap prices stay readable.
#[must_use]
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        format!("${}", group_thousands(price, 2))
    } else {
        format!("${price:.6}")
    }
}

/// Compact dollar quantity with a T/B/M/K suffix.
#[must_use]
pub fn format_large_number(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.2}K", value / 1e3)
    } else {
        format!("${}", group_thousands(value, 0))
    }
}

/// Plain separated number, "N/A" when the feed had no value.
#[must_use]
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(v, 0),
        None => "N/A".to_string(),
    }
}

/// Percentage at two decimals, "N/A" when the feed had no value.
#[must_use]
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}
