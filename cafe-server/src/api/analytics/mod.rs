//! Analytics API (staff)

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use shared::client::AnalyticsQuery;
use shared::models::AnalyticsSummary;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/analytics", get(summary))
}

/// GET /api/analytics?period=today|week|month|all
pub async fn summary(
    State(state): State<ServerState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    let summary = state.analytics.summarize_str(query.period.as_deref())?;
    Ok(Json(summary))
}
