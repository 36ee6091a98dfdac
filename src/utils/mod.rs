//! Utility functions

mod time;

pub use time::{current_millis, timestamp_millis};
