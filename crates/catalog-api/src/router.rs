//! Route definitions for the catalog HTTP API.
//!
//! Public browsing routes and admin routes are mounted under `/api`.
//! Admin handlers take an `AdminContext`, so every admin route requires
//! the `x-admin-session` header.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing allowance on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Twice the image limit so oversize files reach the gateway and get a
    // validation error instead of a bare 413.
    let upload_limit = (state.config.storage.max_image_bytes as usize)
        .saturating_mul(2)
        .saturating_add(UPLOAD_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(catalog_routes())
        .merge(admin_routes(upload_limit));

    let mut router = Router::new().nest("/api", api_routes);
    if let Some(root) = state.media_root.clone() {
        router = router.nest_service("/media", ServeDir::new(root));
    }

    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    router
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Public browsing endpoints
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(handlers::category::list_categories))
        .route("/categories/tree", get(handlers::category::category_tree))
        .route("/products", get(handlers::product::list_products))
        .route("/products/{id}", get(handlers::product::get_product))
}

/// Admin session, CRUD, images, storage, and capabilities
fn admin_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/session",
            post(handlers::session::sign_in).delete(handlers::session::sign_out),
        )
        .route("/admin/categories", post(handlers::category::create_category))
        .route(
            "/admin/categories/{id}",
            put(handlers::category::update_category).delete(handlers::category::delete_category),
        )
        .route("/admin/products", post(handlers::product::create_product))
        .route(
            "/admin/products/{id}",
            put(handlers::product::update_product).delete(handlers::product::delete_product),
        )
        .route(
            "/admin/images",
            post(handlers::image::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/storage", get(handlers::storage::storage_status))
        .route("/admin/capabilities", get(handlers::capability::get_capabilities))
        .route(
            "/admin/capabilities/refresh",
            post(handlers::capability::refresh_capabilities),
        )
}
