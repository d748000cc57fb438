//! Customer identity API
//!
//! | Path | Method |
//! |------|--------|
//! | /api/send-otp | POST |
//! | /api/verify-otp | POST |
//! | /api/customer/register | POST |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/send-otp", post(handler::send_otp))
        .route("/api/verify-otp", post(handler::verify_otp))
        .route("/api/customer/register", post(handler::register))
}
