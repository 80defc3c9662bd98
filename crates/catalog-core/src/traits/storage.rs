//! Object storage trait for pluggable image storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Object key within the bucket.
    pub key: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Trait for object storage backends holding product images.
///
/// Implementations exist for the local filesystem and for an HTTP
/// object-storage REST API. Implementations report a missing bucket with
/// [`ErrorKind::BucketNotFound`](crate::error::ErrorKind::BucketNotFound),
/// authorization failures with
/// [`ErrorKind::Permission`](crate::error::ErrorKind::Permission), and
/// everything else with
/// [`ErrorKind::Repository`](crate::error::ErrorKind::Repository).
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "http").
    fn provider_type(&self) -> &str;

    /// List the names of every bucket visible to the configured credentials.
    async fn list_buckets(&self) -> AppResult<Vec<String>>;

    /// List up to `limit` objects in a bucket.
    async fn list_objects(&self, bucket: &str, limit: usize) -> AppResult<Vec<StorageObjectMeta>>;

    /// Store a new object. Existing objects are never overwritten.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        cache_control: &str,
        data: Bytes,
    ) -> AppResult<()>;

    /// Delete objects by key.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> AppResult<()>;

    /// Public URL under which an object is served.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
