//! Time and timestamp utilities

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Get current Unix timestamp in milliseconds
pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Resolve a client-supplied timestamp to milliseconds since epoch.
///
/// Accepts a JSON number (already in milliseconds) or an RFC 3339 string.
/// Anything else is treated as absent.
pub fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}
