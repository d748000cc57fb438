//! Settings API
//!
//! `GET` is public so the storefront can show when ordering is closed.

use axum::{Extension, Json, Router, extract::State, routing::get};
use shared::client::SettingsResponse;
use shared::models::{Settings, SettingsUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// GET /api/settings
pub async fn get_settings(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    Ok(Json(state.settings.get()?))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(patch): Json<SettingsUpdate>,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state.settings.update(patch)?;
    tracing::info!(
        accepting_orders = settings.accepting_orders,
        operator = %current_user.email,
        "Store settings changed"
    );
    Ok(Json(SettingsResponse {
        success: true,
        settings,
    }))
}
