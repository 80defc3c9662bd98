//! Image storage configuration.

use serde::{Deserialize, Serialize};

/// Which object storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// Directories on the local filesystem.
    #[default]
    Local,
    /// Object-storage REST API over HTTP.
    Http,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Bucket holding product images.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Maximum image size in bytes (default 5 MiB).
    #[serde(default = "default_max_image")]
    pub max_image_bytes: u64,
    /// `max-age` sent with uploaded objects, in seconds.
    #[serde(default = "default_cache_control")]
    pub cache_control_seconds: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// HTTP object storage configuration.
    #[serde(default)]
    pub http: HttpStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::default(),
            bucket: default_bucket(),
            max_image_bytes: default_max_image(),
            cache_control_seconds: default_cache_control(),
            local: LocalStorageConfig::default(),
            http: HttpStorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory; each bucket is a sub-directory.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// URL prefix under which the root directory is served.
    #[serde(default = "default_public_base")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base(),
        }
    }
}

/// HTTP object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpStorageConfig {
    /// Base URL of the storage service (e.g. `https://project.example.co`).
    #[serde(default)]
    pub endpoint: String,
    /// Service key sent as bearer token and `apikey` header.
    #[serde(default)]
    pub service_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            service_key: String::new(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

fn default_bucket() -> String {
    "product-images".to_string()
}

fn default_max_image() -> u64 {
    5_242_880 // 5 MiB
}

fn default_cache_control() -> u64 {
    3600
}

fn default_local_root() -> String {
    "./data/storage".to_string()
}

fn default_public_base() -> String {
    "http://localhost:8080/media".to_string()
}

fn default_http_timeout() -> u64 {
    30
}
