//! Route handlers organized by domain.

pub mod capability;
pub mod category;
pub mod health;
pub mod image;
pub mod product;
pub mod session;
pub mod storage;
