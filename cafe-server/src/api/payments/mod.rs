//! Payment gateway API

use axum::{Json, Router, extract::State, routing::post};
use shared::client::{PaymentOrderRequest, PaymentOrderResponse};

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/create-razorpay-order", post(create_order))
}

/// POST /api/create-razorpay-order
///
/// Amount arrives in rupees and leaves in paise. Gateway failures are 502.
pub async fn create_order(
    State(state): State<ServerState>,
    Json(req): Json<PaymentOrderRequest>,
) -> AppResult<Json<PaymentOrderResponse>> {
    let receipt = format!("rcpt_{}", shared::util::snowflake_id());
    let order = state.payments.create_order(req.amount, &receipt).await?;
    tracing::info!(
        gateway_order_id = %order.order_id,
        amount = order.amount,
        receipt = %receipt,
        "Payment order created"
    );
    Ok(Json(PaymentOrderResponse {
        success: true,
        order_id: order.order_id,
        amount: order.amount,
        currency: order.currency,
    }))
}
