//! HTTP API
//!
//! - `http`: router, CORS, body limit and the route table
//! - `rest`: endpoint handlers
//! - `state`: process-scoped state shared by the handlers

pub mod http;
pub mod rest;
pub mod state;

pub use http::{create_router, ENDPOINTS};
pub use state::AppState;
