//! Object store providers.

#[cfg(feature = "http")]
pub mod http;
pub mod local;

use std::sync::Arc;

use catalog_core::config::{StorageConfig, StorageProviderKind};
use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::traits::ObjectStore;

#[cfg(feature = "http")]
pub use http::HttpObjectStore;
pub use local::LocalObjectStore;

/// Build the object store selected by `storage.provider`.
pub async fn from_config(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider {
        StorageProviderKind::Local => {
            let store = LocalObjectStore::new(&config.local.root_path, &config.local.public_base_url).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "http")]
        StorageProviderKind::Http => Ok(Arc::new(HttpObjectStore::new(&config.http)?)),
        #[cfg(not(feature = "http"))]
        StorageProviderKind::Http => Err(AppError::configuration(
            "The http storage provider is not compiled in (enable the `http` feature)",
        )),
    }
}

/// Reject keys that could escape the bucket namespace.
pub(crate) fn validate_key(key: &str) -> AppResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment == ".." || segment == ".")
    {
        return Err(AppError::validation(format!("Invalid object key: '{key}'")));
    }
    Ok(())
}
