//! Product management.

pub mod draft;
pub mod service;

pub use draft::{ProductDraft, ProductPatch};
pub use service::ProductService;
