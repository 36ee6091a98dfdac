//! Event Store - append-only record log
//!
//! The EventStore owns the newline-delimited record file and the in-memory
//! sequence counter. It is the single writer: every append goes through
//! `&mut self`, so callers serialize writes by holding the store behind a lock.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::LogRecord;

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the newline-delimited record file
    pub log_path: PathBuf,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("debug_logs.jsonl"),
        }
    }
}

impl EventStoreConfig {
    /// Create config with a custom record file
    pub fn new<P: AsRef<Path>>(log_path: P) -> Self {
        Self {
            log_path: log_path.as_ref().to_path_buf(),
        }
    }

    /// Get path to the record file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The EventStore manages the append-only record log
pub struct EventStore {
    config: EventStoreConfig,
    /// Sequence number of the most recent append (0 when empty)
    last_sequence: u64,
}

impl EventStore {
    /// Open the store, discarding anything left over from a previous run
    pub fn open(config: EventStoreConfig) -> EventStoreResult<Self> {
        let mut store = Self {
            config,
            last_sequence: 0,
        };
        store.clear()?;
        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Sequence number the next append will receive
    pub fn next_sequence_number(&self) -> u64 {
        self.last_sequence + 1
    }

    /// Append a record built from normalized client fields.
    ///
    /// The record is written and synced before this returns. The counter only
    /// advances once the write has succeeded, so a failed append never burns
    /// a sequence number.
    pub fn append(
        &mut self,
        fields: Map<String, Value>,
        received_at: i64,
    ) -> EventStoreResult<LogRecord> {
        let record = LogRecord::new(self.next_sequence_number(), received_at, fields);
        let path = self.config.log_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        // One write per line keeps concurrent readers from seeing half a record
        let mut line = record.to_json_line()?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.sync_all()?;

        self.last_sequence = record.sequence_number;
        Ok(record)
    }

    /// Load every readable record in append order.
    ///
    /// Lines that fail to parse are skipped so one corrupt entry never hides
    /// the rest of the log.
    pub fn read_all(&self) -> EventStoreResult<Vec<LogRecord>> {
        let path = self.config.log_path();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(line = line_num + 1, error = %e, "unreadable store line");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            match LogRecord::from_json_line(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::debug!(line = line_num + 1, error = %e, "skipping malformed record");
                }
            }
        }

        Ok(records)
    }

    /// Truncate the log and reset the sequence counter
    pub fn clear(&mut self) -> EventStoreResult<()> {
        let path = self.config.log_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.sync_all()?;

        self.last_sequence = 0;
        Ok(())
    }
}
