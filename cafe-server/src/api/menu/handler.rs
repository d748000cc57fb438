//! Menu API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::client::{MenuItemResponse, MessageResponse};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/menu - items customers can order
pub async fn list_available(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.menu.list_available()?))
}

/// GET /api/menu/all - every item, staff only
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.menu.list_all()?))
}

/// POST /api/menu
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItemResponse>> {
    let item = state.menu.create(payload)?;
    tracing::info!(item_id = %item.id, operator = %current_user.email, "Menu item added");
    Ok(Json(MenuItemResponse { success: true, item }))
}

/// PUT /api/menu/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItemResponse>> {
    let item = state.menu.update(&id, payload)?;
    Ok(Json(MenuItemResponse { success: true, item }))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.menu.delete(&id)?;
    tracing::info!(item_id = %id, operator = %current_user.email, "Menu item removed");
    Ok(Json(MessageResponse::ok("Menu item deleted")))
}
