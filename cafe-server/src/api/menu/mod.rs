//! Menu API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_available).post(handler::create))
        .route("/all", get(handler::list_all))
        .route("/{id}", axum::routing::put(handler::update).delete(handler::delete))
}
