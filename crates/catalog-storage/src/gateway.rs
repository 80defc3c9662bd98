//! Object storage gateway for product images.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use catalog_core::config::StorageConfig;
use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStore;

/// Upper bound on objects listed when computing bucket usage.
const USAGE_LISTING_LIMIT: usize = 10_000;

/// Whether the managed bucket exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketStatus {
    /// The bucket is confirmed present.
    Exists,
    /// The store confirmed the bucket does not exist.
    Missing,
    /// Existence could not be determined.
    Unknown,
}

impl fmt::Display for BucketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "exists"),
            Self::Missing => write!(f, "missing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Object count and size of the managed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Number of stored objects.
    pub file_count: u64,
    /// Sum of object sizes in bytes.
    pub total_bytes: u64,
}

/// An image file received from an admin.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name, used for the extension.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Uploads, removes, and inspects product images in the managed bucket.
#[derive(Debug, Clone)]
pub struct ImageGateway {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    max_image_bytes: u64,
    cache_control: String,
}

impl ImageGateway {
    /// Create a gateway over `store` using the bucket settings in `config`.
    pub fn new(store: Arc<dyn ObjectStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            max_image_bytes: config.max_image_bytes,
            cache_control: format!("max-age={}", config.cache_control_seconds),
        }
    }

    /// Name of the managed bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Provider behind the gateway.
    pub fn provider_type(&self) -> &str {
        self.store.provider_type()
    }

    /// Store an image and return its public URL.
    pub async fn upload(&self, file: ImageUpload, product_id: Option<Uuid>) -> AppResult<String> {
        let content_type = file.content_type.trim().to_ascii_lowercase();
        if !content_type.starts_with("image/") {
            return Err(AppError::validation(format!(
                "Only image files can be uploaded (got '{}')",
                file.content_type
            )));
        }
        if file.data.is_empty() {
            return Err(AppError::validation("Uploaded image is empty"));
        }
        let size = file.data.len() as u64;
        if size > self.max_image_bytes {
            return Err(AppError::validation(format!(
                "Image is {size} bytes, exceeding the limit of {} bytes",
                self.max_image_bytes
            )));
        }

        let key = object_key_for(
            product_id,
            &file.file_name,
            &content_type,
            chrono::Utc::now().timestamp_millis(),
        );

        if let Err(err) = self
            .store
            .put_object(&self.bucket, &key, &content_type, &self.cache_control, file.data)
            .await
        {
            return Err(self.classify_upload_failure(err).await);
        }

        let url = self.store.public_url(&self.bucket, &key);
        info!(bucket = %self.bucket, key = %key, size, "Uploaded product image");
        Ok(url)
    }

    async fn classify_upload_failure(&self, err: AppError) -> AppError {
        match err.kind {
            ErrorKind::Permission | ErrorKind::Validation => err,
            ErrorKind::BucketNotFound => match self.probe_bucket().await {
                BucketStatus::Missing => AppError::bucket_not_found(format!(
                    "Storage bucket '{0}' does not exist. Create a public bucket named '{0}' \
                     in the object store (or set storage.bucket) and retry the upload.",
                    self.bucket
                )),
                status => AppError::repository(format!(
                    "Upload failed and bucket '{}' is {status}: {}",
                    self.bucket, err.message
                )),
            },
            _ => AppError::repository(format!("Failed to upload image: {}", err.message)),
        }
    }

    /// Delete an image by its public URL. Failures are logged, never returned.
    pub async fn remove(&self, public_url: &str) {
        let Some(key) = self.object_key(public_url) else {
            warn!(url = %public_url, bucket = %self.bucket, "Could not derive object key; image left in place");
            return;
        };
        match self.store.delete_objects(&self.bucket, &[key.clone()]).await {
            Ok(()) => info!(bucket = %self.bucket, key = %key, "Removed product image"),
            Err(e) => warn!(bucket = %self.bucket, key = %key, error = %e, "Failed to remove product image"),
        }
    }

    /// Whether `url` points into the managed bucket.
    pub fn is_managed(&self, url: &str) -> bool {
        url.trim()
            .starts_with(&self.store.public_url(&self.bucket, ""))
    }

    /// Object key of a bucket URL: everything after the bucket path segment.
    pub fn object_key(&self, url: &str) -> Option<String> {
        let marker = format!("/{}/", self.bucket);
        let url = url.trim();
        let start = url.find(&marker)? + marker.len();
        let key = url[start..].split(['?', '#']).next().unwrap_or_default();
        if key.is_empty() { None } else { Some(key.to_string()) }
    }

    /// Determine whether the managed bucket exists.
    ///
    /// The bucket listing is authoritative when it shows the bucket. When
    /// it does not (or is denied), a one-object listing of the bucket
    /// decides.
    pub async fn probe_bucket(&self) -> BucketStatus {
        match self.store.list_buckets().await {
            Ok(buckets) if buckets.iter().any(|b| b == &self.bucket) => return BucketStatus::Exists,
            Ok(_) => debug!(bucket = %self.bucket, "Bucket not in listing; probing directly"),
            Err(e) => debug!(bucket = %self.bucket, error = %e, "Bucket listing failed; probing directly"),
        }

        match self.store.list_objects(&self.bucket, 1).await {
            Ok(_) => BucketStatus::Exists,
            Err(e) if e.kind == ErrorKind::BucketNotFound => BucketStatus::Missing,
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "Could not determine bucket status");
                BucketStatus::Unknown
            }
        }
    }

    /// Object count and total size, or `None` when the bucket is missing.
    pub async fn usage(&self) -> AppResult<Option<StorageUsage>> {
        match self.store.list_objects(&self.bucket, USAGE_LISTING_LIMIT).await {
            Ok(objects) => Ok(Some(StorageUsage {
                file_count: objects.len() as u64,
                total_bytes: objects.iter().map(|o| o.size_bytes).sum(),
            })),
            Err(e) if e.kind == ErrorKind::BucketNotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Build a fresh object key.
///
/// `<product_id>-<millis>.<ext>` for an existing product, otherwise
/// `product-<millis>-<7 random chars>.<ext>`.
fn object_key_for(product_id: Option<Uuid>, file_name: &str, content_type: &str, millis: i64) -> String {
    let ext = extension(file_name, content_type);
    match product_id {
        Some(id) => format!("{id}-{millis}.{ext}"),
        None => {
            let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
            format!("product-{millis}-{suffix}.{ext}")
        }
    }
}

/// File extension from the name, else the MIME subtype.
fn extension(file_name: &str, content_type: &str) -> String {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    let ext = match from_name {
        Some(ext) => ext.to_string(),
        None => content_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or_default()
            .split(['+', ';'])
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect(),
    };
    if ext.is_empty() { "bin".to_string() } else { ext.to_ascii_lowercase() }
}
