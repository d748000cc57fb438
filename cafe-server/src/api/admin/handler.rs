//! Staff login handler

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::MAX_PASSWORD_LEN;
use crate::utils::{AppError, AppResult};

/// Fixed delay applied to every login attempt before the outcome is known
const AUTH_FIXED_DELAY_MS: u64 = 500;

const ADMIN_ROLE: &str = "admin";

/// POST /api/admin/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_string();
    // oversized passwords are refused without hashing
    let valid = !email.is_empty()
        && req.password.len() <= MAX_PASSWORD_LEN
        && state.credentials.verify(&email, &req.password);

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if !valid {
        security_log!(WARN, "login_failed", email = %email);
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(ADMIN_ROLE, &email, ADMIN_ROLE)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {}", e)))?;

    security_log!(INFO, "login_succeeded", email = %email);
    Ok(Json(LoginResponse {
        success: true,
        token,
        message: "Login successful".to_string(),
    }))
}
