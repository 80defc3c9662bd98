//! JSON request bodies whose rejections use the API error envelope.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use catalog_core::error::AppError;

use crate::error::ApiError;

/// `Json<T>` that reports malformed or mistyped bodies as `VALIDATION_ERROR`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}
