//! # catalog-core
//!
//! Core crate for the product catalog. Contains configuration schemas,
//! the unified error system, the object storage trait, and the schema
//! capability types shared by the repositories.
//!
//! This crate has **no** internal dependencies on other catalog crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
