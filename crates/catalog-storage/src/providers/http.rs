//! HTTP object-storage REST provider.
//!
//! Talks to a Supabase-compatible storage API rooted at
//! `<endpoint>/storage/v1`, authenticated with a service key.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use catalog_core::config::HttpStorageConfig;
use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::traits::{ObjectStore, StorageObjectMeta};

use super::validate_key;

/// Object store backed by an HTTP storage API.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct BucketEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    name: String,
    /// Folder placeholders are listed with a null id.
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectMetadata {
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    mimetype: Option<String>,
}

impl HttpObjectStore {
    /// Create a new HTTP object store.
    pub fn new(config: &HttpStorageConfig) -> AppResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(AppError::configuration(
                "storage.http.endpoint must be set for the http storage provider",
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to create HTTP client", e)
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim().trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/storage/v1/{path}", self.endpoint)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
    }

    /// Send a request and turn non-success statuses into [`AppError`]s.
    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> AppResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Repository, format!("{action}: {e}"), e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify(status, &body, action))
    }

    async fn json<T: serde::de::DeserializeOwned>(response: reqwest::Response, action: &str) -> AppResult<T> {
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, format!("{action}: invalid response body"), e)
        })
    }
}

/// Map a failed storage API response onto the error taxonomy.
///
/// The API sometimes reports a missing bucket as a 400 whose body carries
/// `"statusCode": "404"`, so the body is consulted as well as the status.
fn classify(status: StatusCode, body: &str, action: &str) -> AppError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let body_status = parsed.as_ref().and_then(|v| v.get("statusCode")).and_then(|code| match code {
        serde_json::Value::String(s) => s.parse::<u16>().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    });
    let detail = parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("error")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(200).collect());

    let effective = body_status.unwrap_or(status.as_u16());
    let message = format!("{action}: {status} {detail}");
    match (status.as_u16(), effective) {
        (401 | 403, _) | (_, 401 | 403) => AppError::permission(message),
        (404, _) | (_, 404) => AppError::bucket_not_found(message),
        _ => AppError::repository(message),
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn provider_type(&self) -> &str {
        "http"
    }

    async fn list_buckets(&self) -> AppResult<Vec<String>> {
        let response = self
            .send(self.client.get(self.url("bucket")), "Failed to list buckets")
            .await?;
        let entries: Vec<BucketEntry> = Self::json(response, "Failed to list buckets").await?;
        Ok(entries
            .into_iter()
            .filter_map(|b| b.name.or(b.id))
            .collect())
    }

    async fn list_objects(&self, bucket: &str, limit: usize) -> AppResult<Vec<StorageObjectMeta>> {
        let body = serde_json::json!({
            "prefix": "",
            "limit": limit,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let response = self
            .send(
                self.client.post(self.url(&format!("object/list/{bucket}"))).json(&body),
                "Failed to list objects",
            )
            .await?;
        let entries: Vec<ObjectEntry> = Self::json(response, "Failed to list objects").await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.id.is_some())
            .map(|entry| {
                let metadata = entry.metadata.unwrap_or_default();
                StorageObjectMeta {
                    key: entry.name,
                    size_bytes: metadata.size.unwrap_or(0),
                    mime_type: metadata.mimetype,
                    last_modified: entry.updated_at,
                }
            })
            .collect())
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
        let size = data.len();
        let request = self
            .client
            .post(self.url(&format!("object/{bucket}/{key}")))
            .header("Content-Type", content_type)
            .header("Cache-Control", cache_control)
            .header("x-upsert", "false")
            .body(data);
        self.send(request, "Failed to upload object").await?;
        debug!(bucket, key, size, "Uploaded object");
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let body = serde_json::json!({ "prefixes": keys });
        self.send(
            self.client.delete(self.url(&format!("object/{bucket}"))).json(&body),
            "Failed to delete objects",
        )
        .await?;
        debug!(bucket, count = keys.len(), "Deleted objects");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.url(&format!("object/public/{bucket}/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> HttpObjectStore {
        HttpObjectStore::new(&HttpStorageConfig {
            endpoint: "https://abc.supabase.co/".to_string(),
            service_key: "service-key".to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            store().public_url("product-images", "p.png"),
            "https://abc.supabase.co/storage/v1/object/public/product-images/p.png"
        );
    }

    #[test]
    fn test_requires_endpoint() {
        let err = HttpObjectStore::new(&HttpStorageConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify(StatusCode::FORBIDDEN, "", "x").kind, ErrorKind::Permission);
        assert_eq!(classify(StatusCode::UNAUTHORIZED, "", "x").kind, ErrorKind::Permission);
        assert_eq!(classify(StatusCode::NOT_FOUND, "", "x").kind, ErrorKind::BucketNotFound);
        assert_eq!(classify(StatusCode::BAD_GATEWAY, "", "x").kind, ErrorKind::Repository);
    }

    #[test]
    fn test_classify_body_status_code() {
        let body = r#"{"statusCode":"404","error":"Bucket not found","message":"Bucket not found"}"#;
        let err = classify(StatusCode::BAD_REQUEST, body, "Failed to upload object");
        assert_eq!(err.kind, ErrorKind::BucketNotFound);
        assert!(err.message.contains("Bucket not found"));

        let body = r#"{"statusCode":403,"message":"new row violates row-level security policy"}"#;
        assert_eq!(classify(StatusCode::BAD_REQUEST, body, "x").kind, ErrorKind::Permission);

        let body = r#"{"statusCode":"409","message":"The resource already exists"}"#;
        assert_eq!(classify(StatusCode::BAD_REQUEST, body, "x").kind, ErrorKind::Repository);
    }
}
