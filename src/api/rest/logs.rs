//! Read-side endpoints and store clearing

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, StatusResponse};
use crate::analysis::{self, LogQuery, TimelineEntry};
use crate::api::state::AppState;
use crate::event_store::EventStoreError;
use crate::types::LogRecord;

/// Query parameters for `GET /logs`.
///
/// Kept as raw strings so a bad number is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct LogsParams {
    pub hypothesis: Option<String>,
    /// Comma-separated level list
    pub level: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub tail: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn window(value: Option<String>) -> Option<usize> {
    value.and_then(|v| v.trim().parse().ok())
}

impl From<LogsParams> for LogQuery {
    fn from(params: LogsParams) -> Self {
        LogQuery {
            hypothesis: non_empty(params.hypothesis),
            levels: non_empty(params.level)
                .map(|raw| LogQuery::parse_levels(&raw))
                .filter(|levels| !levels.is_empty()),
            location: non_empty(params.location),
            search: non_empty(params.search),
            limit: window(params.limit),
            tail: window(params.tail),
        }
    }
}

/// Query parameters for `GET /logs/timeline`
#[derive(Debug, Default, Deserialize)]
pub struct TimelineParams {
    pub hypothesis: Option<String>,
}

/// Response for GET /logs
#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub count: usize,
    pub entries: Vec<LogRecord>,
}

/// Response for GET /logs/timeline
#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub count: usize,
    pub timeline: Vec<TimelineEntry>,
}

fn read_failed(e: EventStoreError) -> Response {
    tracing::error!(error = %e, "failed to read record log");
    ApiError::internal(e.to_string()).respond(StatusCode::INTERNAL_SERVER_ERROR)
}

/// GET /logs - Filtered view of the store
pub async fn query_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogsParams>,
) -> Response {
    let records = match state.store.lock().read_all() {
        Ok(records) => records,
        Err(e) => return read_failed(e),
    };

    let entries = LogQuery::from(params).apply(records);
    Json(LogsResponse {
        count: entries.len(),
        entries,
    })
    .into_response()
}

/// GET /logs/stats - Aggregate counts over the whole store
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.store.lock().read_all() {
        Ok(records) => Json(analysis::aggregate(&records)).into_response(),
        Err(e) => read_failed(e),
    }
}

/// GET /logs/timeline - Chronological view with elapsed times
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimelineParams>,
) -> Response {
    let records = match state.store.lock().read_all() {
        Ok(records) => records,
        Err(e) => return read_failed(e),
    };

    let hypothesis = non_empty(params.hypothesis);
    let timeline = analysis::reconstruct(records, hypothesis.as_deref());
    Json(TimelineResponse {
        count: timeline.len(),
        timeline,
    })
    .into_response()
}

/// DELETE /logs - Truncate the store and reset sequence numbers
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> Response {
    match state.store.lock().clear() {
        Ok(()) => {
            tracing::info!("record log cleared");
            Json(StatusResponse::ok()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to clear record log");
            ApiError::internal(format!("Failed to clear logs: {}", e))
                .respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_to_query() {
        let query = LogQuery::from(LogsParams {
            hypothesis: Some("A".to_string()),
            level: Some("error,warn".to_string()),
            location: Some(String::new()),
            search: None,
            limit: Some("abc".to_string()),
            tail: Some("3".to_string()),
        });

        assert_eq!(query.hypothesis.as_deref(), Some("A"));
        assert_eq!(
            query.levels,
            Some(vec!["error".to_string(), "warn".to_string()])
        );
        assert_eq!(query.location, None);
        assert_eq!(query.limit, None);
        assert_eq!(query.tail, Some(3));
    }

    #[test]
    fn test_blank_level_list_means_no_filter() {
        let query = LogQuery::from(LogsParams {
            level: Some(" , ".to_string()),
            ..Default::default()
        });
        assert_eq!(query.levels, None);
        assert_eq!(query, LogQuery::default());
    }
}
