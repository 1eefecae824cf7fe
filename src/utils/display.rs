// Fallbacks used by the admin projections when a field is missing.
use chrono::{DateTime, Utc};

pub const UNKNOWN: &str = "Unknown";
pub const NO_EMAIL: &str = "No email";
pub const NOT_PROVIDED: &str = "Not provided";
pub const DEFAULT_STATUS: &str = "Active";

/// Blank strings count as missing.
pub fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
