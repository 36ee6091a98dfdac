//! Data types for the debug collector
//!
//! This module contains the record model shared by ingestion, storage and analysis.

mod record;

pub use record::{ErrorDescriptor, LogRecord, DEFAULT_LEVEL};
