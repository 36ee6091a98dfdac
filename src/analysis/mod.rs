//! Read-side analysis over the full record log
//!
//! Each view is derived from a fresh `EventStore::read_all()`:
//! - `query`: filter, search and trailing windows for `GET /logs`
//! - `stats`: whole-store aggregation for `GET /logs/stats`
//! - `timeline`: chronological reconstruction for `GET /logs/timeline`

mod query;
mod stats;
mod timeline;

pub use query::LogQuery;
pub use stats::{aggregate, LogStats, TimeRange, NO_HYPOTHESIS};
pub use timeline::{reconstruct, TimelineEntry, UNTAGGED};
