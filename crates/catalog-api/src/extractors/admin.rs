//! Admin extractors: the session header on admin routes and the bearer
//! token presented at sign-in.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use catalog_auth::AdminSession;
use catalog_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the admin session ID.
pub const ADMIN_SESSION_HEADER: &str = "x-admin-session";

/// The open admin session behind the current request.
#[derive(Debug, Clone)]
pub struct AdminContext(pub AdminSession);

impl AdminContext {
    /// The session ID.
    pub fn session_id(&self) -> Uuid {
        self.0.session_id
    }

    /// The signed-in admin.
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ADMIN_SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing x-admin-session header"))?;

        let session_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::authentication("Malformed admin session id"))?;

        let session = state.sessions.resolve(session_id)?;
        Ok(AdminContext(session))
    }
}

/// Bearer token from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        Ok(BearerToken(token.to_string()))
    }
}
