//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`menu`] - menu catalog
//! - [`orders`] - customer orders, walk-ins, status changes
//! - [`analytics`] - sales summaries
//! - [`settings`] - store switches
//! - [`customers`] - OTP verification and registration
//! - [`admin`] - staff login
//! - [`payments`] - gateway order creation

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod middleware;

pub mod admin;
pub mod analytics;
pub mod customers;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod settings;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(analytics::router())
        .merge(settings::router())
        .merge(customers::router())
        .merge(admin::router())
        .merge(payments::router())
}

/// Routes plus middleware, bound to `state`
///
/// Used by the HTTP server and by in-process tests.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn(middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // staff token check runs first and injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_staff,
        ))
        .with_state(state)
}
