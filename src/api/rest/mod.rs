//! REST API module for HTTP endpoints
//!
//! - `POST /ingest/:sessionId` - Ingest one record
//! - `POST /ingest/:sessionId/batch` - Ingest `{ entries: [...] }`
//! - `GET /logs` - Filtered query
//! - `GET /logs/stats` - Whole-store aggregation
//! - `GET /logs/timeline` - Chronological reconstruction
//! - `DELETE /logs` - Clear the store

pub mod ingest;
pub mod logs;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body of a successful write
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            processed: None,
            skipped: None,
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "PAYLOAD_TOO_LARGE".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }

    /// Pair the error body with a status code
    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
