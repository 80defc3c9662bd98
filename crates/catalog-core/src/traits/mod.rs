//! Core traits defined in `catalog-core` and implemented by other crates.

pub mod storage;

pub use storage::{ObjectStore, StorageObjectMeta};
