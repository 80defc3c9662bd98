//! User role entities.

pub mod role;

pub use role::UserRole;
