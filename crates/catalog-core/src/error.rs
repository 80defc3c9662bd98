//! Unified application error types for the catalog.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

use crate::types::capability::SchemaGap;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input failed validation before any network call.
    Validation,
    /// The referenced resource was not found.
    NotFound,
    /// The connected database lacks a column this operation needs.
    Schema,
    /// A category delete was blocked by child categories.
    HasChildren,
    /// A category delete was blocked by products referencing it.
    HasProducts,
    /// The object storage bucket is confirmed absent.
    BucketNotFound,
    /// The caller (or the service key) is not allowed to perform the action.
    Permission,
    /// The caller could not be authenticated.
    Authentication,
    /// Transport or store failure (database or object store unreachable).
    Repository,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Schema => write!(f, "SCHEMA"),
            Self::HasChildren => write!(f, "HAS_CHILDREN"),
            Self::HasProducts => write!(f, "HAS_PRODUCTS"),
            Self::BucketNotFound => write!(f, "BUCKET_NOT_FOUND"),
            Self::Permission => write!(f, "PERMISSION"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Repository => write!(f, "REPOSITORY"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout the catalog.
///
/// Schema errors additionally carry the [`SchemaGap`] that caused them so
/// callers can decide on a fallback write without inspecting message text.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// The missing schema capability, for [`ErrorKind::Schema`] errors.
    pub schema_gap: Option<SchemaGap>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            schema_gap: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            schema_gap: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a schema error for a known missing column.
    ///
    /// The message carries the operator-facing remediation.
    pub fn schema(gap: SchemaGap) -> Self {
        Self {
            kind: ErrorKind::Schema,
            message: gap.remediation(),
            schema_gap: Some(gap),
            source: None,
        }
    }

    /// Create a schema error that does not map to a known optional column.
    pub fn schema_unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    /// Create a has-children error.
    pub fn has_children(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HasChildren, message)
    }

    /// Create a has-products error.
    pub fn has_products(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HasProducts, message)
    }

    /// Create a bucket-not-found error.
    pub fn bucket_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BucketNotFound, message)
    }

    /// Create a permission error.
    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permission, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a repository (transport/store) error.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Repository, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the failure is a transient infrastructure problem that the
    /// caller may simply retry later.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::Repository
    }

    /// Whether the failure needs an operator to run a migration.
    pub fn requires_migration(&self) -> bool {
        self.kind == ErrorKind::Schema
    }

    /// Whether this error was caused by the missing column behind `gap`.
    pub fn is_schema_gap(&self, gap: SchemaGap) -> bool {
        self.kind == ErrorKind::Schema && self.schema_gap == Some(gap)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            schema_gap: self.schema_gap,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Repository, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_carries_remediation() {
        let err = AppError::schema(SchemaGap::ProductGallery);
        assert!(err.requires_migration());
        assert!(!err.is_transient());
        assert!(err.is_schema_gap(SchemaGap::ProductGallery));
        assert!(!err.is_schema_gap(SchemaGap::CategoryHierarchy));
        assert!(err.message.contains("products.images"));
        assert!(err.message.contains("0003_product_gallery.sql"));
    }

    #[test]
    fn test_repository_error_is_transient() {
        let err = AppError::repository("connection refused");
        assert!(err.is_transient());
        assert!(!err.requires_migration());
        assert_eq!(err.to_string(), "REPOSITORY: connection refused");
    }

    #[test]
    fn test_clone_keeps_gap_drops_source() {
        let io = std::io::Error::other("boom");
        let mut err = AppError::from(io);
        err.schema_gap = Some(SchemaGap::CategoryHierarchy);
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Repository);
        assert_eq!(cloned.schema_gap, Some(SchemaGap::CategoryHierarchy));
        assert!(cloned.source.is_none());
    }
}
