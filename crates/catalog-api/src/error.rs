//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use catalog_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Whether retrying later may succeed without any change.
    pub transient: bool,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code and machine-readable code for the error kind.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self.0.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Schema => (StatusCode::SERVICE_UNAVAILABLE, "MIGRATION_REQUIRED"),
            ErrorKind::HasChildren => (StatusCode::CONFLICT, "HAS_CHILDREN"),
            ErrorKind::HasProducts => (StatusCode::CONFLICT, "HAS_PRODUCTS"),
            ErrorKind::BucketNotFound => (StatusCode::SERVICE_UNAVAILABLE, "BUCKET_NOT_FOUND"),
            ErrorKind::Permission => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Repository => (StatusCode::BAD_GATEWAY, "STORE_UNAVAILABLE"),
            ErrorKind::Configuration => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR"),
            ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        if !self.0.requires_migration() {
            return None;
        }
        Some(match self.0.schema_gap {
            Some(gap) => json!({
                "table": gap.table(),
                "column": gap.column(),
                "migration": gap.migration(),
                "unavailable": gap.capability(),
                "remediation": gap.remediation(),
            }),
            None => json!({ "remediation": self.0.message }),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status();

        let message = if status.is_server_error() && !self.0.requires_migration() {
            match self.0.kind {
                ErrorKind::Repository => {
                    tracing::warn!(error = %self.0, "Store unavailable");
                    self.0.message.clone()
                }
                ErrorKind::BucketNotFound => self.0.message.clone(),
                _ => {
                    tracing::error!(error = %self.0, source = ?self.0.source, "Internal server error");
                    "An internal error occurred".to_string()
                }
            }
        } else {
            self.0.message.clone()
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            transient: self.0.is_transient(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::types::SchemaGap;

    async fn body(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_schema_gap_maps_to_migration_required() {
        let (status, json) = body(AppError::schema(SchemaGap::CategoryHierarchy)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "MIGRATION_REQUIRED");
        assert_eq!(json["transient"], false);
        assert_eq!(json["details"]["column"], "parent_id");
        assert_eq!(json["details"]["migration"], "0002_category_hierarchy.sql");
        assert!(json["details"]["remediation"]
            .as_str()
            .unwrap()
            .contains("product_categories.parent_id"));
    }

    #[tokio::test]
    async fn test_repository_error_is_transient_bad_gateway() {
        let (status, json) = body(AppError::repository("connection refused")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "STORE_UNAVAILABLE");
        assert_eq!(json["transient"], true);
        assert_eq!(json["message"], "connection refused");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_message_is_masked() {
        let (status, json) = body(AppError::internal("secret pool state")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[test]
    fn test_status_per_kind() {
        let cases = [
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::has_children("x"), StatusCode::CONFLICT),
            (AppError::has_products("x"), StatusCode::CONFLICT),
            (AppError::bucket_not_found("x"), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::permission("x"), StatusCode::FORBIDDEN),
            (AppError::authentication("x"), StatusCode::UNAUTHORIZED),
            (AppError::configuration("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::schema_unknown("x"), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status().0, expected);
        }
    }
}
