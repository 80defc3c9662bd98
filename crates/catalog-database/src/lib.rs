//! # catalog-database
//!
//! PostgreSQL connection management, migrations, the store traits the
//! service layer is written against, and their sqlx implementations.
//!
//! With the `memory` feature the crate also provides [`memory::MemoryCatalog`],
//! an in-process store used by tests that can pretend optional columns
//! have not been migrated yet.

pub mod connection;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CategoryStore, ProductStore, RoleStore, SchemaProbe};
