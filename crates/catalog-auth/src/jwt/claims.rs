//! Claims carried by identity provider tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The subset of identity token claims the catalog relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Email address, when the provider includes it.
    #[serde(default)]
    pub email: Option<String>,
}

impl IdentityClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
