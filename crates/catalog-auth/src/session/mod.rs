//! Admin session registry.

pub mod manager;

pub use manager::{AdminSession, SessionManager};
