//! Debug Collector
//!
//! A local, single-process log collection service for debugging sessions.
//! Instrumented code posts structured trace events over HTTP; the service
//! appends them to a newline-delimited JSON file and answers query, stats and
//! timeline requests so competing failure hypotheses can be checked against
//! live evidence.
//!
//! # Modules
//!
//! - `types`: The `LogRecord` model
//! - `event_store`: Append-only record log with sequence assignment
//! - `ingest`: Payload normalization, batch ingestion, console mirror
//! - `analysis`: Query engine, statistics aggregator, timeline reconstructor
//! - `api`: Axum router and REST handlers
//! - `config`: Command-line and environment configuration
//! - `logging`: Tracing subscriber setup
//! - `utils`: Utility functions (timestamps)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use debug_collector::{create_router, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let state = Arc::new(AppState::from_config(&config)?);
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, create_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod event_store;
pub mod ingest;
pub mod logging;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use event_store::{EventStore, EventStoreConfig, EventStoreError};
pub use ingest::{ConsoleMirror, IngestError, Ingestor};
pub use types::LogRecord;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
