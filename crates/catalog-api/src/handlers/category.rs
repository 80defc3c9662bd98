//! Category browsing and admin CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use catalog_entity::category::{Category, CategoryTree};

use crate::dto::request::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::{AdminContext, JsonBody};
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = state.categories.list_categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/categories/tree
pub async fn category_tree(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CategoryTree>>, ApiError> {
    let tree = state.categories.category_tree().await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    admin: AdminContext,
    JsonBody(req): JsonBody<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    tracing::debug!(admin = %admin.user_id(), name = %req.name, "Creating category");
    let category = state
        .categories
        .create_category(&req.name, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    JsonBody(req): JsonBody<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    tracing::debug!(admin = %admin.user_id(), category_id = %id, "Updating category");
    let category = state.categories.update_category(id, req.into()).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    tracing::debug!(admin = %admin.user_id(), category_id = %id, "Deleting category");
    state.categories.delete_category(id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { id, deleted: true })))
}
