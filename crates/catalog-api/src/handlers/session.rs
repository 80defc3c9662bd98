//! Admin sign-in and sign-out.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, SessionResponse};
use crate::error::ApiError;
use crate::extractors::{AdminContext, BearerToken};
use crate::state::AppState;

/// POST /api/admin/session
pub async fn sign_in(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    let session = state.sessions.sign_in(&token).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(SessionResponse {
            session_id: session.session_id,
            user_id: session.user_id,
            expires_at: session.expires_at,
        })),
    ))
}

/// DELETE /api/admin/session
pub async fn sign_out(
    State(state): State<AppState>,
    admin: AdminContext,
) -> Json<serde_json::Value> {
    let signed_out = state.sessions.sign_out(admin.session_id());
    Json(serde_json::json!({ "success": true, "data": { "signed_out": signed_out } }))
}
