//! Schema capability inspection.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, CapabilitiesResponse};
use crate::error::ApiError;
use crate::extractors::AdminContext;
use crate::state::AppState;

/// GET /api/admin/capabilities
pub async fn get_capabilities(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Json<ApiResponse<CapabilitiesResponse>> {
    let capabilities = state.capabilities.current().await;
    Json(ApiResponse::ok(capabilities.into()))
}

/// POST /api/admin/capabilities/refresh
pub async fn refresh_capabilities(
    State(state): State<AppState>,
    admin: AdminContext,
) -> Result<Json<ApiResponse<CapabilitiesResponse>>, ApiError> {
    let capabilities = state.capabilities.refresh().await?;
    tracing::info!(
        admin = %admin.user_id(),
        category_hierarchy = capabilities.category_hierarchy,
        product_gallery = capabilities.product_gallery,
        "Schema capabilities refreshed"
    );
    Ok(Json(ApiResponse::ok(capabilities.into())))
}
