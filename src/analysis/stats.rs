//! Statistics aggregation over the whole store

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::LogRecord;

/// Bucket for records without a hypothesis tag
pub const NO_HYPOTHESIS: &str = "none";

/// Response body for `GET /logs/stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total_entries: usize,
    pub by_hypothesis: BTreeMap<String, usize>,
    pub by_level: BTreeMap<String, usize>,
    /// Keyed by the part of `location` before the first `:`
    pub by_file: BTreeMap<String, usize>,
    pub time_range: TimeRange,
    pub error_count: usize,
}

/// Span of client-supplied timestamps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl TimeRange {
    fn include(&mut self, ts: i64) {
        self.start = Some(self.start.map_or(ts, |s| s.min(ts)));
        self.end = Some(self.end.map_or(ts, |e| e.max(ts)));
    }
}

/// Aggregate counts and the time range across every record
pub fn aggregate(records: &[LogRecord]) -> LogStats {
    let mut stats = LogStats {
        total_entries: records.len(),
        ..Default::default()
    };

    for record in records {
        let hypothesis = record.hypothesis_id().unwrap_or(NO_HYPOTHESIS);
        *stats.by_hypothesis.entry(hypothesis.to_string()).or_insert(0) += 1;

        *stats.by_level.entry(record.level().to_string()).or_insert(0) += 1;

        if let Some(location) = record.location() {
            let file = location.split(':').next().unwrap_or(location);
            *stats.by_file.entry(file.to_string()).or_insert(0) += 1;
        }

        if let Some(ts) = record.timestamp() {
            stats.time_range.include(ts);
        }

        if record.is_error() {
            stats.error_count += 1;
        }
    }

    if let (Some(start), Some(end)) = (stats.time_range.start, stats.time_range.end) {
        stats.time_range.duration_ms = Some(end.saturating_sub(start));
    }

    stats
}
