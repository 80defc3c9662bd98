//! Custom Axum extractors.

pub mod admin;
pub mod json;

pub use admin::{ADMIN_SESSION_HEADER, AdminContext, BearerToken};
pub use json::JsonBody;
