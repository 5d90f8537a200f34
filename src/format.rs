//! Plain-text number formatting for insight copy and the HTML page.

/// Groups thousands with `,` and keeps one decimal only when the value
/// carries a fraction.
pub fn format_number(value: f64) -> String {
    let text = format!("{:.1}", value.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let mut grouped = group_thousands(whole);
    if fraction != "0" {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    if value < 0.0 && grouped.chars().any(|ch| ch != '0' && ch != '.') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{}M", trim_decimal(value / 1_000_000.0))
    } else if magnitude >= 1_000.0 {
        format!("{}k", trim_decimal(value / 1_000.0))
    } else {
        trim_decimal(value)
    }
}

fn trim_decimal(value: f64) -> String {
    let text = format!("{value:.1}");
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
