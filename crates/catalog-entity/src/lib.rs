//! # catalog-entity
//!
//! Domain entity models for the product catalog. Every struct in this
//! crate represents a database table row or a domain value object.
//! Categories derive `sqlx::FromRow` directly; products are decoded from
//! a row type in `catalog-database` because their JSON columns need
//! lenient parsing.

pub mod category;
pub mod product;
pub mod user;
