//! Timeline reconstruction - chronological view with inter-event latency

use serde::Serialize;

use crate::types::LogRecord;

/// Hypothesis shown for untagged records
pub const UNTAGGED: &str = "-";

/// One row of the reconstructed timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub sequence_number: u64,
    pub timestamp: Option<i64>,
    /// Milliseconds since the previous row
    pub elapsed: i64,
    pub hypothesis: String,
    pub level: String,
    pub location: Option<String>,
    pub message: Option<String>,
    pub has_data: bool,
    pub has_error: bool,
}

/// Build the timeline, optionally restricted to one hypothesis.
///
/// Records are ordered by client timestamp (missing counts as zero). The sort
/// is stable, so ties keep ingestion order.
pub fn reconstruct(records: Vec<LogRecord>, hypothesis: Option<&str>) -> Vec<TimelineEntry> {
    let mut records: Vec<LogRecord> = match hypothesis {
        Some(h) => records
            .into_iter()
            .filter(|r| r.hypothesis_id() == Some(h))
            .collect(),
        None => records,
    };
    records.sort_by_key(|r| r.timestamp().unwrap_or(0));

    let mut previous: Option<i64> = None;
    let mut timeline = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let timestamp = record.timestamp();
        let elapsed = match (index, previous, timestamp) {
            (0, _, _) => 0,
            (_, Some(prev), Some(ts)) => ts.saturating_sub(prev),
            _ => 0,
        };
        previous = timestamp;

        timeline.push(TimelineEntry {
            sequence_number: record.sequence_number,
            timestamp,
            elapsed,
            hypothesis: record.hypothesis_id().unwrap_or(UNTAGGED).to_string(),
            level: record.level().to_string(),
            location: record.location().map(str::to_string),
            message: record.message().map(str::to_string),
            has_data: record.has_data(),
            has_error: record.has_error(),
        });
    }

    timeline
}
