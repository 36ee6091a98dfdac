//! Ingestion - turns raw client payloads into stored records
//!
//! Every payload is normalized the same way whether it arrives alone or as
//! part of a batch: server-owned fields are assigned, `level` is defaulted,
//! and everything else is stored untouched.

mod console;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::event_store::{EventStore, EventStoreError};
use crate::types::{LogRecord, DEFAULT_LEVEL};
use crate::utils::current_millis;

pub use console::{render, ConsoleMirror, DATA_PREVIEW_CHARS, STACK_PREVIEW_LINES};

/// Errors that can occur while ingesting a request
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Log entry must be a JSON object")]
    NotAnObject,

    #[error("Request body must contain an 'entries' array")]
    MissingEntries,

    #[error("Failed to persist log entry: {0}")]
    Store(#[from] EventStoreError),

    #[error("Failed to persist batch entry after storing {processed}: {source}")]
    BatchStore {
        /// Entries already stored before the failure
        processed: usize,
        #[source]
        source: EventStoreError,
    },
}

/// Result of a batch ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Entries stored
    pub processed: usize,
    /// Entries dropped because they were not JSON objects
    pub skipped: usize,
}

/// Normalize one client payload into the fields stored alongside the
/// server-assigned sequence number and receive time.
pub fn normalize(session_id: &str, payload: Value) -> Result<Map<String, Value>, IngestError> {
    let Value::Object(mut fields) = payload else {
        return Err(IngestError::NotAnObject);
    };

    // Server-owned; a client copy would collide with the assigned values
    fields.remove("sequenceNumber");
    fields.remove("receivedAt");

    match fields.get("level") {
        None | Some(Value::Null) => {
            fields.insert("level".to_string(), Value::from(DEFAULT_LEVEL));
        }
        Some(_) => {}
    }

    fields
        .entry("sessionId")
        .or_insert_with(|| Value::from(session_id));

    Ok(fields)
}

/// Write side of the service: the single path into the event store
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<Mutex<EventStore>>,
    mirror: ConsoleMirror,
}

impl Ingestor {
    pub fn new(store: Arc<Mutex<EventStore>>, mirror: ConsoleMirror) -> Self {
        Self { store, mirror }
    }

    /// Ingest a single JSON object
    pub fn ingest(&self, session_id: &str, body: &[u8]) -> Result<LogRecord, IngestError> {
        let payload: Value = serde_json::from_slice(body)?;
        let fields = normalize(session_id, payload)?;

        let record = self.store.lock().append(fields, current_millis())?;
        self.mirror.show(&record);
        tracing::debug!(
            session = session_id,
            seq = record.sequence_number,
            "ingested record"
        );

        Ok(record)
    }

    /// Ingest `{ "entries": [...] }`.
    ///
    /// The body must parse as one JSON document. Entries are stored in array
    /// order under a single lock so their sequence numbers are contiguous;
    /// entries that are not objects are skipped without affecting the rest.
    /// A storage failure stops the batch; entries already stored stay and the
    /// error reports how many there were.
    pub fn ingest_batch(&self, session_id: &str, body: &[u8]) -> Result<BatchOutcome, IngestError> {
        let payload: Value = serde_json::from_slice(body)?;
        let entries = match payload {
            Value::Object(mut obj) => match obj.remove("entries") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(IngestError::MissingEntries),
            },
            _ => return Err(IngestError::MissingEntries),
        };

        let mut outcome = BatchOutcome::default();
        let received_at = current_millis();
        let mut store = self.store.lock();

        for (index, entry) in entries.into_iter().enumerate() {
            let fields = match normalize(session_id, entry) {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::warn!(session = session_id, index, error = %e, "skipping batch entry");
                    outcome.skipped += 1;
                    continue;
                }
            };

            let record = store
                .append(fields, received_at)
                .map_err(|source| IngestError::BatchStore {
                    processed: outcome.processed,
                    source,
                })?;
            self.mirror.show(&record);
            outcome.processed += 1;
        }

        tracing::debug!(
            session = session_id,
            processed = outcome.processed,
            skipped = outcome.skipped,
            "ingested batch"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::EventStoreConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_ingestor() -> (Ingestor, Arc<Mutex<EventStore>>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventStoreConfig::new(temp_dir.path().join("logs.jsonl"));
        let store = Arc::new(Mutex::new(EventStore::open(config).unwrap()));
        let ingestor = Ingestor::new(store.clone(), ConsoleMirror::disabled());
        (ingestor, store, temp_dir)
    }

    #[test]
    fn test_normalize_defaults_level_and_session() {
        let fields = normalize("sess-1", json!({"message": "hi"})).unwrap();

        assert_eq!(fields["level"], "info");
        assert_eq!(fields["sessionId"], "sess-1");
        assert_eq!(fields["message"], "hi");
    }

    #[test]
    fn test_normalize_keeps_client_fields() {
        let fields = normalize(
            "path-session",
            json!({
                "level": "warn",
                "sessionId": "client-session",
                "sequenceNumber": 99,
                "receivedAt": 5,
                "custom": [1, 2, 3]
            }),
        )
        .unwrap();

        assert_eq!(fields["level"], "warn");
        assert_eq!(fields["sessionId"], "client-session");
        assert_eq!(fields["custom"], json!([1, 2, 3]));
        assert!(!fields.contains_key("sequenceNumber"));
        assert!(!fields.contains_key("receivedAt"));
    }

    #[test]
    fn test_normalize_rejects_non_objects() {
        assert!(matches!(
            normalize("s", json!([1, 2])),
            Err(IngestError::NotAnObject)
        ));
        assert!(matches!(
            normalize("s", json!("text")),
            Err(IngestError::NotAnObject)
        ));
    }

    #[test]
    fn test_ingest_single() {
        let (ingestor, store, _temp_dir) = create_ingestor();

        let record = ingestor
            .ingest("s1", br#"{"message": "hello", "hypothesisId": "A"}"#)
            .unwrap();

        assert_eq!(record.sequence_number, 1);
        assert_eq!(record.hypothesis_id(), Some("A"));
        assert_eq!(store.lock().read_all().unwrap(), vec![record]);
    }

    #[test]
    fn test_invalid_json_does_not_advance_counter() {
        let (ingestor, store, _temp_dir) = create_ingestor();

        let err = ingestor.ingest("s1", b"{not json").unwrap_err();
        assert!(matches!(err, IngestError::InvalidJson(_)));
        assert_eq!(store.lock().next_sequence_number(), 1);

        let record = ingestor.ingest("s1", br#"{"message": "ok"}"#).unwrap();
        assert_eq!(record.sequence_number, 1);
    }

    #[test]
    fn test_batch_in_order_after_existing_records() {
        let (ingestor, store, _temp_dir) = create_ingestor();
        ingestor.ingest("s1", br#"{"message": "before"}"#).unwrap();

        let body = json!({
            "entries": [
                {"message": "one"},
                {"message": "two"},
                {"message": "three"}
            ]
        })
        .to_string();
        let outcome = ingestor.ingest_batch("s1", body.as_bytes()).unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 3, skipped: 0 });

        let records = store.lock().read_all().unwrap();
        let messages: Vec<_> = records.iter().filter_map(|r| r.message()).collect();
        let seqs: Vec<_> = records.iter().map(|r| r.sequence_number).collect();
        assert_eq!(messages, vec!["before", "one", "two", "three"]);
        assert_eq!(seqs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_batch_skips_malformed_entries() {
        let (ingestor, store, _temp_dir) = create_ingestor();

        let body = json!({"entries": [{"message": "a"}, 42, null, {"message": "b"}]}).to_string();
        let outcome = ingestor.ingest_batch("s1", body.as_bytes()).unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 2, skipped: 2 });
        assert_eq!(store.lock().next_sequence_number(), 3);
    }

    #[test]
    fn test_batch_storage_failure_reports_processed_count() {
        let (ingestor, store, _temp_dir) = create_ingestor();
        ingestor.ingest("s1", br#"{"message": "stored"}"#).unwrap();

        // Swap the log file for a directory so the next append cannot open it
        let path = store.lock().config().log_path().to_path_buf();
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let body = json!({"entries": [{"message": "a"}, {"message": "b"}]}).to_string();
        let err = ingestor.ingest_batch("s1", body.as_bytes()).unwrap_err();

        assert!(matches!(err, IngestError::BatchStore { processed: 0, .. }));
        assert_eq!(store.lock().next_sequence_number(), 2);
    }

    #[test]
    fn test_batch_requires_entries_array() {
        let (ingestor, _store, _temp_dir) = create_ingestor();

        for body in [r#"{"items": []}"#, r#"{"entries": {}}"#, "[]"] {
            assert!(matches!(
                ingestor.ingest_batch("s1", body.as_bytes()),
                Err(IngestError::MissingEntries)
            ));
        }
        assert!(matches!(
            ingestor.ingest_batch("s1", b"{\"entries\": [").unwrap_err(),
            IngestError::InvalidJson(_)
        ));
    }
}
