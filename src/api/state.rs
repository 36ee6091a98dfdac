//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::event_store::{EventStore, EventStoreConfig, EventStoreResult};
use crate::ingest::{ConsoleMirror, Ingestor};

/// Process-scoped state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// The single record log; the lock is the single-writer discipline
    pub store: Arc<Mutex<EventStore>>,
    /// Write path into the store
    pub ingestor: Ingestor,
    /// Port reported by `/health`
    pub port: u16,
    /// Record file reported by `/health`
    pub log_file: PathBuf,
    /// Request body cap enforced by the router
    pub max_body_bytes: usize,
    pub started_at: Instant,
}

impl AppState {
    /// Open (and reset) the store described by `config`
    pub fn from_config(config: &ServerConfig) -> EventStoreResult<Self> {
        let store = EventStore::open(config.store_config())?;
        let mut state = Self::new(store, ConsoleMirror::new(!config.no_mirror), config.port);
        state.max_body_bytes = config.max_body_bytes;
        Ok(state)
    }

    /// Wrap an already-open store
    pub fn new(store: EventStore, mirror: ConsoleMirror, port: u16) -> Self {
        let log_file = store.config().log_path().to_path_buf();
        let store = Arc::new(Mutex::new(store));

        Self {
            ingestor: Ingestor::new(store.clone(), mirror),
            store,
            port,
            log_file,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            started_at: Instant::now(),
        }
    }

    /// Convenience for tests and embedding: open a store at `config`
    pub fn with_store_config(config: EventStoreConfig, mirror: ConsoleMirror) -> EventStoreResult<Self> {
        Ok(Self::new(EventStore::open(config)?, mirror, 0))
    }

    /// Whole seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
