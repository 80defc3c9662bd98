//! # catalog-storage
//!
//! Product image storage for the catalog: the [`ImageGateway`] that
//! uploads, removes, and probes the managed bucket, the object store
//! providers behind it, and the pure image reference [`resolver`].

pub mod gateway;
pub mod providers;
pub mod resolver;

pub use gateway::{BucketStatus, ImageGateway, ImageUpload, StorageUsage};
