//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// Always 200. An unreachable database reports `degraded`.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database_reachable = state.capabilities.store_reachable().await;
    Json(ApiResponse::ok(HealthResponse {
        status: if database_reachable { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        database_reachable,
        schema: state.capabilities.peek().await,
    }))
}
