//! Orders API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/orders | POST | none |
//! | /api/orders | GET | staff |
//! | /api/orders/walk-in | POST | staff |
//! | /api/orders/{id} | GET | none |
//! | /api/orders/{id}/status | PUT | staff |
//!
//! `{id}` accepts the order id or the display number.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/walk-in", post(handler::create_walk_in))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
}
