//! Product image upload.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;

use catalog_core::error::AppError;
use catalog_storage::ImageUpload;

use crate::dto::request::UploadQuery;
use crate::dto::response::{ApiResponse, UploadResponse};
use crate::error::ApiError;
use crate::extractors::AdminContext;
use crate::state::AppState;

/// POST /api/admin/images?product_id=...
///
/// Reads the multipart field `file` and stores it in the managed bucket.
pub async fn upload_image(
    State(state): State<AppState>,
    admin: AdminContext,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), ApiError> {
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        upload = Some(ImageUpload {
            file_name,
            content_type,
            data,
        });
    }

    let upload = upload.ok_or_else(|| AppError::validation("Missing multipart field 'file'"))?;
    tracing::debug!(
        admin = %admin.user_id(),
        file_name = %upload.file_name,
        size = upload.data.len(),
        "Uploading product image"
    );

    let url = state.images.upload(upload, query.product_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(UploadResponse { url }))))
}
