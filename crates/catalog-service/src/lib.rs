//! # catalog-service
//!
//! Business logic for the catalog. Services follow constructor injection:
//! the store traits, the capability cache, and the image gateway are all
//! provided at construction time via `Arc` references.
//!
//! Writes that may touch an optional column go through
//! [`CapabilityCache::negotiate`], which retries once without the column
//! when the database turns out not to have it.

pub mod capability;
pub mod category;
pub mod product;

pub use capability::CapabilityCache;
pub use category::CategoryService;
pub use product::{ProductDraft, ProductPatch, ProductService};
