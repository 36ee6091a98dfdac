//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::rest::{ingest, logs, ApiError};
use super::state::AppState;

/// Endpoints advertised in 404 responses
pub const ENDPOINTS: &[&str] = &[
    "POST /ingest/:sessionId",
    "POST /ingest/:sessionId/batch",
    "GET /health",
    "GET /logs",
    "GET /logs/stats",
    "GET /logs/timeline",
    "DELETE /logs",
];

/// Path → handler table. Methods a path does not list fall through to 404.
fn route_table() -> Vec<(&'static str, MethodRouter<Arc<AppState>>)> {
    vec![
        ("/ingest/:session_id", post(ingest::ingest_single)),
        ("/ingest/:session_id/batch", post(ingest::ingest_batch)),
        ("/health", get(health_check)),
        ("/logs", get(logs::query_logs).delete(logs::clear_logs)),
        ("/logs/stats", get(logs::get_stats)),
        ("/logs/timeline", get(logs::get_timeline)),
    ]
}

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    route_table()
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            router.route(path, handler.fallback(not_found))
        })
        .fallback(not_found)
        .layer(body_limit)
        .layer(middleware::from_fn(answer_options))
        .layer(cors)
        .with_state(state)
}

/// Any OPTIONS request that is not a full CORS preflight still gets an empty 200
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

#[derive(Debug, Serialize)]
struct NotFoundResponse {
    #[serde(flatten)]
    error: ApiError,
    endpoints: &'static [&'static str],
}

async fn not_found() -> Response {
    let body = NotFoundResponse {
        error: ApiError::not_found("Not found"),
        endpoints: ENDPOINTS,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Response for GET /health
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub log_count: usize,
    /// Seconds since startup
    pub uptime: u64,
    pub port: u16,
    pub log_file: String,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let log_count = match state.store.lock().read_all() {
        Ok(records) => records.len(),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not read record log");
            0
        }
    };

    Json(HealthResponse {
        status: "ok",
        log_count,
        uptime: state.uptime_secs(),
        port: state.port,
        log_file: state.log_file.display().to_string(),
    })
}
