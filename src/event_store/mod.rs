//! Event Store Module
//!
//! This module provides the append-only record log:
//! - `EventStore`: owns the record file and the sequence counter
//! - `EventStoreConfig`: where the log lives
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────┐    ┌──────────────────┐    ┌─────────────────────┐
//! │ POST     │───►│ assign seq +     │───►│ append line, fsync  │
//! │ /ingest  │    │ receivedAt       │    │ debug_logs.jsonl    │
//! └──────────┘    └──────────────────┘    └─────────────────────┘
//!
//! Read Path (every query):
//! ┌──────────────┐    ┌───────────────────┐
//! │ read_all()   │───►│ skip corrupt lines│───► query / stats / timeline
//! └──────────────┘    └───────────────────┘
//! ```
//!
//! All file I/O is synchronous. Handlers call into the store under the shared
//! `parking_lot::Mutex` on the request task itself, so an append blocks that
//! worker for the write and `fsync`, and every read scans the whole file.

mod store;

pub use store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
