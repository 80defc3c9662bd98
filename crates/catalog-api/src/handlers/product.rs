//! Product browsing and admin CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use catalog_service::ProductDraft;

use crate::dto::request::{ProductListQuery, UpdateProductRequest};
use crate::dto::response::{ApiResponse, DeletedResponse, ProductView};
use crate::error::ApiError;
use crate::extractors::{AdminContext, JsonBody};
use crate::state::AppState;

/// GET /api/products?category=...
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductView>>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let products = state.products.list_products(category).await?;
    Ok(Json(ApiResponse::ok(
        products.into_iter().map(ProductView::from).collect(),
    )))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductView>>, ApiError> {
    let product = state.products.get_product(id).await?;
    Ok(Json(ApiResponse::ok(product.into())))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    admin: AdminContext,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ProductView>>), ApiError> {
    tracing::debug!(admin = %admin.user_id(), name = %draft.name, "Creating product");
    let product = state.products.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product.into()))))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
    JsonBody(req): JsonBody<UpdateProductRequest>,
) -> Result<Json<ApiResponse<ProductView>>, ApiError> {
    tracing::debug!(admin = %admin.user_id(), product_id = %id, "Updating product");
    let product = state.products.update_product(id, req.into()).await?;
    Ok(Json(ApiResponse::ok(product.into())))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AdminContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    tracing::debug!(admin = %admin.user_id(), product_id = %id, "Deleting product");
    state.products.delete_product(id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { id, deleted: true })))
}
