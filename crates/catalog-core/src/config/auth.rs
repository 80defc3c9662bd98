//! Admin session configuration.

use serde::{Deserialize, Serialize};

/// Settings for bearer-token validation and admin sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared with the identity provider that issues tokens.
    #[serde(default)]
    pub jwt_secret: String,
    /// Clock skew tolerance for token expiry, in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// How long an admin session stays valid after sign-in.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            leeway_seconds: default_leeway(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_leeway() -> u64 {
    5
}

fn default_session_ttl() -> u64 {
    480
}
