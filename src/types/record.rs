//! Log record type - the unit of evidence persisted by the event store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::timestamp_millis;

/// Level assigned to records that arrive without one
pub const DEFAULT_LEVEL: &str = "info";

/// A persisted log record.
///
/// Only `sequenceNumber` and `receivedAt` are owned by the server. Every other
/// field is kept exactly as the client sent it, so the record is modelled as a
/// JSON object with typed accessors for the fields the engine interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Monotonic sequence number assigned at ingestion
    pub sequence_number: u64,
    /// Server receive time in milliseconds since epoch
    pub received_at: i64,
    /// Client-supplied fields (including the defaulted `level`)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogRecord {
    /// Create a record from already-normalized client fields
    pub fn new(sequence_number: u64, received_at: i64, fields: Map<String, Value>) -> Self {
        Self {
            sequence_number,
            received_at,
            fields,
        }
    }

    /// Serialize to a single JSON line (without the trailing newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a record from one line of the store
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn is_present(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(v) if !v.is_null())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.str_field("sessionId")
    }

    pub fn hypothesis_id(&self) -> Option<&str> {
        self.str_field("hypothesisId").filter(|h| !h.is_empty())
    }

    /// Effective level, falling back to [`DEFAULT_LEVEL`]
    pub fn level(&self) -> &str {
        self.str_field("level").unwrap_or(DEFAULT_LEVEL)
    }

    pub fn location(&self) -> Option<&str> {
        self.str_field("location").filter(|l| !l.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// Client event time in milliseconds, if it carries a usable one
    pub fn timestamp(&self) -> Option<i64> {
        self.fields.get("timestamp").and_then(timestamp_millis)
    }

    pub fn data(&self) -> Option<&Value> {
        self.fields.get("data").filter(|v| !v.is_null())
    }

    pub fn has_data(&self) -> bool {
        self.is_present("data")
    }

    pub fn has_error(&self) -> bool {
        self.is_present("error")
    }

    /// The structured error descriptor, if one was attached
    pub fn error(&self) -> Option<ErrorDescriptor> {
        self.fields
            .get("error")
            .filter(|v| !v.is_null())
            .map(ErrorDescriptor::from_value)
    }

    /// A record counts as an error when its level says so or it carries an error
    pub fn is_error(&self) -> bool {
        self.level() == "error" || self.has_error()
    }
}

/// Lenient view over a record's `error` field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub message: Option<String>,
    pub name: Option<String>,
    pub stack: Option<String>,
}

impl ErrorDescriptor {
    /// Read an error descriptor from a JSON value.
    ///
    /// A bare string is taken as the message.
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        match value {
            Value::String(s) => Self {
                message: Some(s.clone()),
                ..Default::default()
            },
            Value::Object(_) => Self {
                message: text("message"),
                name: text("name"),
                stack: text("stack"),
            },
            other => Self {
                message: Some(other.to_string()),
                ..Default::default()
            },
        }
    }

    /// First `n` non-empty lines of the stack trace
    pub fn stack_head(&self, n: usize) -> Vec<&str> {
        self.stack
            .as_deref()
            .map(|s| {
                s.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .take(n)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> LogRecord {
        LogRecord::new(1, 1000, fields.as_object().cloned().unwrap())
    }

    #[test]
    fn test_json_line_shape() {
        let rec = record(json!({"level": "warn", "message": "slow", "data": {"ms": 900}}));
        let line = rec.to_json_line().unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["sequenceNumber"], 1);
        assert_eq!(value["receivedAt"], 1000);
        assert_eq!(value["level"], "warn");
        assert_eq!(value["data"]["ms"], 900);

        let parsed = LogRecord::from_json_line(&line).unwrap();
        assert_eq!(parsed, rec);
    }

    #[test]
    fn test_line_without_sequence_number_is_rejected() {
        assert!(LogRecord::from_json_line(r#"{"message": "orphan"}"#).is_err());
        assert!(LogRecord::from_json_line("{\"sequenceNumber\": 1, \"rece").is_err());
    }

    #[test]
    fn test_accessors() {
        let rec = record(json!({
            "hypothesisId": "H1",
            "location": "auth.ts:42",
            "message": "token expired",
            "timestamp": 1234,
            "data": null,
        }));

        assert_eq!(rec.hypothesis_id(), Some("H1"));
        assert_eq!(rec.session_id(), None);
        assert_eq!(rec.level(), "info");
        assert_eq!(rec.location(), Some("auth.ts:42"));
        assert_eq!(rec.message(), Some("token expired"));
        assert_eq!(rec.timestamp(), Some(1234));
        assert!(!rec.has_data());
        assert!(!rec.has_error());
        assert!(!rec.is_error());
    }

    #[test]
    fn test_session_id() {
        let rec = record(json!({"sessionId": "debug-run-3"}));
        assert_eq!(rec.session_id(), Some("debug-run-3"));
    }

    #[test]
    fn test_is_error_from_level_or_field() {
        assert!(record(json!({"level": "error"})).is_error());
        assert!(record(json!({"level": "debug", "error": {"message": "boom"}})).is_error());
        assert!(!record(json!({"level": "warn"})).is_error());
    }

    #[test]
    fn test_error_descriptor() {
        let rec = record(json!({
            "error": {
                "name": "TypeError",
                "message": "x is undefined",
                "stack": "TypeError: x is undefined\n  at a (a.js:1)\n\n  at b (b.js:2)\n  at c (c.js:3)\n  at d (d.js:4)"
            }
        }));
        let err = rec.error().unwrap();

        assert_eq!(err.name.as_deref(), Some("TypeError"));
        assert_eq!(err.message.as_deref(), Some("x is undefined"));
        assert_eq!(
            err.stack_head(3),
            vec!["TypeError: x is undefined", "at a (a.js:1)", "at b (b.js:2)"]
        );

        let bare = ErrorDescriptor::from_value(&json!("connection reset"));
        assert_eq!(bare.message.as_deref(), Some("connection reset"));
        assert!(bare.stack_head(3).is_empty());
    }
}
