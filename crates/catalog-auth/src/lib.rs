//! # catalog-auth
//!
//! Admin session context for the catalog.
//!
//! - `jwt`: validation of the bearer tokens issued by the external
//!   identity provider
//! - `session`: the admin session registry (explicit sign-in, lookup,
//!   sign-out)

pub mod jwt;
pub mod session;

pub use jwt::{IdentityClaims, TokenDecoder};
pub use session::{AdminSession, SessionManager};
