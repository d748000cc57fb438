//! Orders API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::client::{OrderCreatedResponse, OrderListQuery, OrderResponse, StatusUpdateRequest};
use shared::models::{NewOrder, Order, OrderStatus};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - customer checkout
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<NewOrder>,
) -> AppResult<Json<OrderCreatedResponse>> {
    let order = state.orders.create_order(payload).await?;
    Ok(Json(OrderCreatedResponse {
        success: true,
        order,
    }))
}

/// POST /api/orders/walk-in - counter order, accepted immediately
pub async fn create_walk_in(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<NewOrder>,
) -> AppResult<Json<OrderCreatedResponse>> {
    let order = state.orders.create_walk_in_order(payload).await?;
    tracing::info!(
        order_id = order.order_id,
        operator = %current_user.email,
        "Walk-in order taken"
    );
    Ok(Json(OrderCreatedResponse {
        success: true,
        order,
    }))
}

/// GET /api/orders?status=X - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<OrderStatus>().map_err(AppError::validation)?),
    };
    Ok(Json(state.orders.list_orders(status)?))
}

/// GET /api/orders/{id} - order tracking
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(&id)?))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<OrderResponse>> {
    let status = payload
        .status
        .trim()
        .parse::<OrderStatus>()
        .map_err(AppError::validation)?;

    let order = state
        .orders
        .update_status(&id, status, payload.version)
        .await?;
    tracing::info!(
        order_id = order.order_id,
        status = %order.status,
        operator = %current_user.email,
        "Order status changed"
    );
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}
