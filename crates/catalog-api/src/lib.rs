//! # catalog-api
//!
//! HTTP API layer for the product catalog built on Axum.
//!
//! Provides the public browsing endpoints, the admin endpoints guarded by
//! an admin session header, request logging and CORS middleware,
//! extractors, DTOs, and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
