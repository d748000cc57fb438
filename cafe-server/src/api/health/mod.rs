//! Health check
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/health | GET | none |
//!
//! ```json
//! { "status": "ok", "message": "BeanBox café server is running", "version": "0.1.0" }
//! ```

use axum::{Json, Router, routing::get};
use shared::client::HealthResponse;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "BeanBox café server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
