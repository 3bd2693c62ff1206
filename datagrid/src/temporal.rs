//! Calendar timestamp parsing shared by sorting and cell formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Accepted ISO-8601 layouts without an offset, tried in order.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a JSON value as an ISO-8601 calendar timestamp.
///
/// Strings with an offset are normalised to UTC; strings without one are
/// taken as-is; a bare date means midnight. Anything else is `None`.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
