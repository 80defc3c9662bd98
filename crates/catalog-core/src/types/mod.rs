//! Core type definitions used across the catalog workspace.

pub mod capability;

pub use capability::{SchemaCapabilities, SchemaGap};
