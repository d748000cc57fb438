//! Customer identity handlers

use axum::{Json, extract::State};
use shared::client::{RegisterResponse, SendOtpResponse, VerifyOtpResponse};
use shared::models::{RegisterRequest, SendOtpRequest, VerifyOtpRequest};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/send-otp - create a pending customer and email a code
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(req): Json<SendOtpRequest>,
) -> AppResult<Json<SendOtpResponse>> {
    let user_id = state.verifier.send_otp(req).await?;
    Ok(Json(SendOtpResponse {
        success: true,
        user_id,
        message: "Verification code sent to your email".to_string(),
    }))
}

/// POST /api/verify-otp
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(req): Json<VerifyOtpRequest>,
) -> AppResult<Json<VerifyOtpResponse>> {
    let user = state.verifier.verify_otp(&req.user_id, &req.otp)?;
    Ok(Json(VerifyOtpResponse {
        success: true,
        user,
    }))
}

/// POST /api/customer/register - unverified customer record
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let customer = state.verifier.register(req)?;
    Ok(Json(RegisterResponse {
        success: true,
        customer_id: customer.id,
        name: customer.name,
        email: customer.email,
    }))
}
