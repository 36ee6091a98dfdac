//! Query engine - filter, search and trailing-window selection

use crate::types::LogRecord;

/// Filters accepted by `GET /logs`. All supplied filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Exact match on `hypothesisId`
    pub hypothesis: Option<String>,
    /// Allow-list of effective levels
    pub levels: Option<Vec<String>>,
    /// Substring of `location`
    pub location: Option<String>,
    /// Case-insensitive substring of `message` or `location`
    pub search: Option<String>,
    /// Keep the last N matches
    pub limit: Option<usize>,
    /// Keep the last N matches, applied after `limit`
    pub tail: Option<usize>,
}

impl LogQuery {
    /// Parse a comma-separated level list, ignoring blank items
    pub fn parse_levels(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether a single record passes every predicate filter
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(hypothesis) = &self.hypothesis {
            if record.hypothesis_id() != Some(hypothesis.as_str()) {
                return false;
            }
        }

        if let Some(levels) = &self.levels {
            let level = record.level();
            if !levels.iter().any(|l| l == level) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            match record.location() {
                Some(loc) if loc.contains(location.as_str()) => {}
                _ => return false,
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = |field: Option<&str>| {
                field.is_some_and(|text| text.to_lowercase().contains(&needle))
            };
            if !hit(record.message()) && !hit(record.location()) {
                return false;
            }
        }

        true
    }

    /// Run the query over the full store contents
    pub fn apply(&self, records: Vec<LogRecord>) -> Vec<LogRecord> {
        let filtered: Vec<LogRecord> = records.into_iter().filter(|r| self.matches(r)).collect();

        let limited = match self.limit {
            Some(n) => take_last(filtered, n),
            None => filtered,
        };

        match self.tail {
            Some(n) => take_last(limited, n),
            None => limited,
        }
    }
}

/// Keep the last `n` items, preserving their order
fn take_last<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let start = items.len().saturating_sub(n);
    items.drain(..start);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(seq: u64, fields: Value) -> LogRecord {
        LogRecord::new(seq, 0, fields.as_object().cloned().unwrap())
    }

    fn sample() -> Vec<LogRecord> {
        vec![
            record(1, json!({"hypothesisId": "A", "level": "info", "location": "auth.ts:login", "message": "start login"})),
            record(2, json!({"hypothesisId": "A", "level": "error", "location": "auth.ts:verify", "message": "Token rejected"})),
            record(3, json!({"hypothesisId": "B", "level": "warn", "location": "db.ts:query", "message": "slow query"})),
            record(4, json!({"location": "cache.ts:get", "message": "cache miss"})),
            record(5, json!({"hypothesisId": "B", "level": "error", "message": "pool exhausted"})),
        ]
    }

    fn seqs(records: &[LogRecord]) -> Vec<u64> {
        records.iter().map(|r| r.sequence_number).collect()
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let result = LogQuery::default().apply(sample());
        assert_eq!(seqs(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_store() {
        let query = LogQuery {
            hypothesis: Some("A".to_string()),
            tail: Some(3),
            ..Default::default()
        };
        assert!(query.apply(Vec::new()).is_empty());
    }

    #[test]
    fn test_hypothesis_filter_is_exact() {
        let query = LogQuery {
            hypothesis: Some("A".to_string()),
            ..Default::default()
        };
        assert_eq!(seqs(&query.apply(sample())), vec![1, 2]);

        let unknown = LogQuery {
            hypothesis: Some("a".to_string()),
            ..Default::default()
        };
        assert!(unknown.apply(sample()).is_empty());
    }

    #[test]
    fn test_level_filter_uses_effective_level() {
        let info = LogQuery {
            levels: Some(LogQuery::parse_levels("info")),
            ..Default::default()
        };
        // record 4 has no level and defaults to info
        assert_eq!(seqs(&info.apply(sample())), vec![1, 4]);
    }

    #[test]
    fn test_level_list_is_superset_of_single_level() {
        let errors = LogQuery {
            levels: Some(LogQuery::parse_levels("error")),
            ..Default::default()
        }
        .apply(sample());
        let errors_and_warnings = LogQuery {
            levels: Some(LogQuery::parse_levels("error, warn,")),
            ..Default::default()
        }
        .apply(sample());

        assert_eq!(seqs(&errors), vec![2, 5]);
        assert_eq!(seqs(&errors_and_warnings), vec![2, 3, 5]);
        assert!(errors.iter().all(|r| errors_and_warnings.contains(r)));
    }

    #[test]
    fn test_location_filter_is_substring() {
        let query = LogQuery {
            location: Some("auth.ts".to_string()),
            ..Default::default()
        };
        assert_eq!(seqs(&query.apply(sample())), vec![1, 2]);
    }

    #[test]
    fn test_search_matches_message_or_location_case_insensitively() {
        let by_message = LogQuery {
            search: Some("TOKEN".to_string()),
            ..Default::default()
        };
        assert_eq!(seqs(&by_message.apply(sample())), vec![2]);

        let by_location = LogQuery {
            search: Some("Cache.TS".to_string()),
            ..Default::default()
        };
        assert_eq!(seqs(&by_location.apply(sample())), vec![4]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let query = LogQuery {
            hypothesis: Some("B".to_string()),
            levels: Some(vec!["error".to_string()]),
            ..Default::default()
        };
        assert_eq!(seqs(&query.apply(sample())), vec![5]);
    }

    #[test]
    fn test_limit_keeps_most_recent_matches() {
        let query = LogQuery {
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(seqs(&query.apply(sample())), vec![4, 5]);

        let larger = LogQuery {
            limit: Some(50),
            ..Default::default()
        };
        assert_eq!(larger.apply(sample()).len(), 5);
    }

    #[test]
    fn test_tail_applies_after_filters() {
        let query = LogQuery {
            levels: Some(vec!["error".to_string(), "warn".to_string()]),
            tail: Some(2),
            ..Default::default()
        };
        assert_eq!(seqs(&query.apply(sample())), vec![3, 5]);
    }

    #[test]
    fn test_limit_then_tail() {
        let query = LogQuery {
            limit: Some(4),
            tail: Some(3),
            ..Default::default()
        };
        // limit keeps [2,3,4,5], tail then keeps [3,4,5]
        assert_eq!(seqs(&query.apply(sample())), vec![3, 4, 5]);

        let tail_wider = LogQuery {
            limit: Some(2),
            tail: Some(4),
            ..Default::default()
        };
        assert_eq!(seqs(&tail_wider.apply(sample())), vec![4, 5]);
    }

    #[test]
    fn test_zero_window_is_empty() {
        let query = LogQuery {
            tail: Some(0),
            ..Default::default()
        };
        assert!(query.apply(sample()).is_empty());
    }
}
