//! Local filesystem object store.
//!
//! Buckets are directories directly under the root path and objects are
//! files inside them. Objects are served by the API under
//! `<public_base_url>/<bucket>/<key>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::traits::{ObjectStore, StorageObjectMeta};

use super::validate_key;

/// Local filesystem object store.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Directory holding one sub-directory per bucket.
    root: PathBuf,
    /// URL prefix the API serves the root under.
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Repository,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a bucket directory if it does not exist yet.
    pub async fn ensure_bucket(&self, bucket: &str) -> AppResult<()> {
        validate_key(bucket)?;
        let path = self.root.join(bucket);
        fs::create_dir_all(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Repository,
                format!("Failed to create bucket directory: {}", path.display()),
                e,
            )
        })?;
        debug!(bucket, "Ensured local bucket");
        Ok(())
    }

    /// Directory of an existing bucket.
    async fn bucket_dir(&self, bucket: &str) -> AppResult<PathBuf> {
        validate_key(bucket)?;
        let path = self.root.join(bucket);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(AppError::bucket_not_found(format!("Bucket not found: {bucket}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::bucket_not_found(format!("Bucket not found: {bucket}")))
            }
            Err(e) => Err(io_error(e, format!("Failed to open bucket: {bucket}"))),
        }
    }
}

fn io_error(e: std::io::Error, message: String) -> AppError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        AppError::with_source(ErrorKind::Permission, message, e)
    } else {
        AppError::with_source(ErrorKind::Repository, message, e)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn list_buckets(&self) -> AppResult<Vec<String>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| io_error(e, "Failed to list buckets".to_string()))?;

        let mut buckets = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| io_error(e, "Failed to read bucket entry".to_string()))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                buckets.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        buckets.sort();
        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str, limit: usize) -> AppResult<Vec<StorageObjectMeta>> {
        let path = self.bucket_dir(bucket).await?;
        let mut dir = fs::read_dir(&path)
            .await
            .map_err(|e| io_error(e, format!("Failed to list bucket: {bucket}")))?;

        let mut objects = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| io_error(e, "Failed to read object entry".to_string()))?
        {
            let meta = entry
                .metadata()
                .await
                .map_err(|e| io_error(e, "Failed to get object metadata".to_string()))?;
            if !meta.is_file() {
                continue;
            }
            let key = entry.file_name().to_string_lossy().to_string();
            objects.push(StorageObjectMeta {
                mime_type: image_mime_from_key(&key),
                key,
                size_bytes: meta.len(),
                last_modified: meta.modified().ok().map(chrono::DateTime::<chrono::Utc>::from),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        objects.truncate(limit);
        Ok(objects)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        cache_control: &str,
        data: Bytes,
    ) -> AppResult<()> {
        validate_key(key)?;
        let path = self.bucket_dir(bucket).await?.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(e, format!("Failed to create directory for: {key}")))?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    AppError::validation(format!("Object already exists: {bucket}/{key}"))
                } else {
                    io_error(e, format!("Failed to create object: {key}"))
                }
            })?;
        file.write_all(&data)
            .await
            .map_err(|e| io_error(e, format!("Failed to write object: {key}")))?;
        file.flush()
            .await
            .map_err(|e| io_error(e, format!("Failed to flush object: {key}")))?;

        debug!(bucket, key, content_type, cache_control, bytes = data.len(), "Stored object");
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> AppResult<()> {
        let dir = self.bucket_dir(bucket).await?;
        for key in keys {
            validate_key(key)?;
            match fs::remove_file(dir.join(key)).await {
                Ok(()) => debug!(bucket, key = %key, "Deleted object"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_error(e, format!("Failed to delete object: {key}"))),
            }
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.public_base_url)
    }
}

/// MIME type for the image extensions the catalog stores.
fn image_mime_from_key(key: &str) -> Option<String> {
    let (_, ext) = key.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime.to_string())
}
