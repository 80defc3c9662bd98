//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use catalog_core::types::{SchemaCapabilities, SchemaGap};
use catalog_entity::product::Product;
use catalog_storage::resolver;
use catalog_storage::{BucketStatus, StorageUsage};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether the database answered a round trip.
    pub database_reachable: bool,
    /// Last known schema capabilities, if the database was probed yet.
    pub schema: Option<SchemaCapabilities>,
}

/// A product with its image references resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Resolved primary image.
    pub display_image: Option<String>,
    /// Resolved gallery, falling back to the single image.
    pub gallery: Vec<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let display_image = resolver::resolve(product.primary_image());
        let gallery = resolver::resolve_gallery(product.image.as_deref(), product.images.as_deref());
        Self {
            product,
            display_image,
            gallery,
        }
    }
}

/// Result of a successful image upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored image.
    pub url: String,
}

/// Bucket status and usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStatusResponse {
    pub provider: String,
    pub bucket: String,
    pub status: BucketStatus,
    /// Present only when the bucket exists.
    pub usage: Option<StorageUsage>,
}

/// One missing optional column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingColumn {
    pub gap: SchemaGap,
    pub table: String,
    pub column: String,
    pub migration: String,
    pub unavailable: String,
}

impl From<SchemaGap> for MissingColumn {
    fn from(gap: SchemaGap) -> Self {
        Self {
            gap,
            table: gap.table().to_string(),
            column: gap.column().to_string(),
            migration: gap.migration().to_string(),
            unavailable: gap.capability().to_string(),
        }
    }
}

/// Cached schema capabilities and what they leave out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    pub capabilities: SchemaCapabilities,
    pub missing: Vec<MissingColumn>,
}

impl From<SchemaCapabilities> for CapabilitiesResponse {
    fn from(capabilities: SchemaCapabilities) -> Self {
        Self {
            capabilities,
            missing: capabilities.missing().into_iter().map(MissingColumn::from).collect(),
        }
    }
}

/// Deleted resource acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: Uuid,
    pub deleted: bool,
}

/// Admin session handed back at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Value for the `x-admin-session` header.
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}
