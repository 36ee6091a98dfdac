//! Ingestion endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::{ApiError, StatusResponse};
use crate::api::state::AppState;
use crate::ingest::IngestError;

/// 500 body for a batch cut short by a storage failure
#[derive(Debug, Serialize)]
struct BatchFailure {
    #[serde(flatten)]
    error: ApiError,
    /// Entries stored before the failure
    processed: usize,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        match &self {
            IngestError::InvalidJson(_) | IngestError::NotAnObject | IngestError::MissingEntries => {
                ApiError::bad_request(self.to_string()).respond(StatusCode::BAD_REQUEST)
            }
            IngestError::Store(e) => {
                tracing::error!(error = %e, "failed to persist record");
                ApiError::internal(self.to_string()).respond(StatusCode::INTERNAL_SERVER_ERROR)
            }
            IngestError::BatchStore { processed, source } => {
                tracing::error!(error = %source, processed, "batch stopped by storage failure");
                let body = BatchFailure {
                    error: ApiError::internal(self.to_string()),
                    processed: *processed,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Map a body read failure (usually the size cap) to a JSON error
fn body_rejection(rejection: BytesRejection) -> Response {
    let status = rejection.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("rejected oversized request body");
        ApiError::payload_too_large("Request body exceeds size limit").respond(status)
    } else {
        ApiError::bad_request(rejection.body_text()).respond(status)
    }
}

/// POST /ingest/:sessionId - Store one record
pub async fn ingest_single(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection(rejection),
    };

    match state.ingestor.ingest(&session_id, &body) {
        Ok(_) => Json(StatusResponse::ok()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /ingest/:sessionId/batch - Store every entry of `{ entries: [...] }`
pub async fn ingest_batch(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejection(rejection),
    };

    match state.ingestor.ingest_batch(&session_id, &body) {
        Ok(outcome) => Json(StatusResponse {
            processed: Some(outcome.processed),
            skipped: (outcome.skipped > 0).then_some(outcome.skipped),
            ..StatusResponse::ok()
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
