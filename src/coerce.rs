use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Strings are parsed after trimming; anything non-finite yields `fallback`.
pub fn to_number(value: &Value, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(number) if number.is_finite() => number,
        _ => fallback,
    }
}

/// Offset timestamps are converted to UTC; unparseable input comes back unchanged.
pub fn to_calendar_date(value: &str) -> String {
    parse_date(value)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn safe_array<T>(value: &Value, map: impl FnMut(&Value) -> T) -> Vec<T> {
    match value {
        Value::Array(items) => items.iter().map(map).collect(),
        _ => Vec::new(),
    }
}

pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        finite_or_zero(part / whole * 100.0)
    } else {
        0.0
    }
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(stamp.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()
}
