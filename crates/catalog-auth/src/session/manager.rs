//! Admin session lifecycle: sign-in, lookup, sign-out.
//!
//! Sessions live in process memory. The role table is consulted once at
//! sign-in; later lookups never touch the database.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use catalog_core::config::AuthConfig;
use catalog_core::error::AppError;
use catalog_database::store::RoleStore;

use crate::jwt::TokenDecoder;

/// An authenticated admin's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Opaque session identifier presented on admin requests.
    pub session_id: Uuid,
    /// The signed-in user.
    pub user_id: Uuid,
    /// When the session was opened.
    pub started_at: DateTime<Utc>,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Opens, resolves, and closes admin sessions.
#[derive(Clone)]
pub struct SessionManager {
    /// Token validation.
    decoder: TokenDecoder,
    /// Role lookups at sign-in.
    roles: Arc<dyn RoleStore>,
    /// Open sessions by ID.
    sessions: Arc<DashMap<Uuid, AdminSession>>,
    /// Session lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("active_sessions", &self.sessions.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(config: &AuthConfig, roles: Arc<dyn RoleStore>) -> Self {
        Self {
            decoder: TokenDecoder::new(config),
            roles,
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::minutes(config.session_ttl_minutes as i64),
        }
    }

    /// Validate a bearer token and open an admin session.
    ///
    /// Fails with an authentication error for invalid tokens and a
    /// permission error for users without the admin role.
    pub async fn sign_in(&self, bearer_token: &str) -> Result<AdminSession, AppError> {
        let claims = self.decoder.decode(bearer_token)?;
        let user_id = claims.user_id();

        let role = self.roles.find_role(user_id).await?;
        if !role.is_some_and(|r| r.is_admin()) {
            warn!(user_id = %user_id, "Admin sign-in refused: user is not an admin");
            return Err(AppError::permission("Admin role required"));
        }

        let now = Utc::now();
        let session = AdminSession {
            session_id: Uuid::new_v4(),
            user_id,
            started_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(session.session_id, session.clone());

        info!(
            user_id = %user_id,
            session_id = %session.session_id,
            expires_at = %session.expires_at,
            "Admin signed in"
        );
        Ok(session)
    }

    /// Look up an open session. Expired sessions are evicted and rejected.
    pub fn resolve(&self, session_id: Uuid) -> Result<AdminSession, AppError> {
        let session = self
            .sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::authentication("Unknown or expired admin session"))?;

        if session.is_expired_at(Utc::now()) {
            self.sessions.remove(&session_id);
            info!(session_id = %session_id, user_id = %session.user_id, "Admin session expired");
            return Err(AppError::authentication("Admin session has expired"));
        }
        Ok(session)
    }

    /// Close a session. Returns whether it was open.
    pub fn sign_out(&self, session_id: Uuid) -> bool {
        match self.sessions.remove(&session_id) {
            Some((_, session)) => {
                info!(session_id = %session_id, user_id = %session.user_id, "Admin signed out");
                true
            }
            None => false,
        }
    }

    /// Drop every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            info!(purged, "Purged expired admin sessions");
        }
        purged
    }

    /// Number of open sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::error::ErrorKind;
    use catalog_database::memory::MemoryCatalog;
    use catalog_entity::user::UserRole;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "session-secret";

    fn config(ttl_minutes: u64) -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            session_ttl_minutes: ttl_minutes,
            ..Default::default()
        }
    }

    fn token(user_id: Uuid) -> String {
        let claims = serde_json::json!({
            "sub": user_id,
            "exp": Utc::now().timestamp() + 600,
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_checks_role_once() {
        let store = MemoryCatalog::new();
        let admin = Uuid::new_v4();
        store.assign_role(admin, UserRole::Admin).await.unwrap();
        let manager = SessionManager::new(&config(60), Arc::new(store.clone()));

        let session = manager.sign_in(&token(admin)).await.unwrap();
        let statements = store.statement_count();

        for _ in 0..3 {
            assert_eq!(manager.resolve(session.session_id).unwrap().user_id, admin);
        }
        assert_eq!(store.statement_count(), statements);

        assert!(manager.sign_out(session.session_id));
        let err = manager.resolve(session.session_id).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(!manager.sign_out(session.session_id));
    }

    #[tokio::test]
    async fn test_non_admin_refused() {
        let store = MemoryCatalog::new();
        let user = Uuid::new_v4();
        store.assign_role(user, UserRole::User).await.unwrap();
        let manager = SessionManager::new(&config(60), Arc::new(store));

        let err = manager.sign_in(&token(user)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Permission);

        let err = manager.sign_in(&token(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Permission);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let manager = SessionManager::new(&config(60), Arc::new(MemoryCatalog::new()));
        let err = manager.sign_in("garbage").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_expired_session_evicted() {
        let store = MemoryCatalog::new();
        let admin = Uuid::new_v4();
        store.assign_role(admin, UserRole::Admin).await.unwrap();
        let manager = SessionManager::new(&config(0), Arc::new(store));

        let session = manager.sign_in(&token(admin)).await.unwrap();
        assert!(manager.resolve(session.session_id).is_err());
        assert_eq!(manager.active_count(), 0);

        manager.sign_in(&token(admin)).await.unwrap();
        assert_eq!(manager.purge_expired(), 1);
    }
}
