//! Bucket status handler.

use axum::Json;
use axum::extract::State;

use catalog_storage::BucketStatus;

use crate::dto::response::{ApiResponse, StorageStatusResponse};
use crate::error::ApiError;
use crate::extractors::AdminContext;
use crate::state::AppState;

/// GET /api/admin/storage
pub async fn storage_status(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<ApiResponse<StorageStatusResponse>>, ApiError> {
    let status = state.images.probe_bucket().await;
    let usage = match status {
        BucketStatus::Exists => state.images.usage().await?,
        BucketStatus::Missing | BucketStatus::Unknown => None,
    };

    Ok(Json(ApiResponse::ok(StorageStatusResponse {
        provider: state.images.provider_type().to_string(),
        bucket: state.images.bucket().to_string(),
        status,
        usage,
    })))
}
