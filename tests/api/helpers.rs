//! Shared test helpers for API tests.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use catalog_api::AppState;
use catalog_api::extractors::ADMIN_SESSION_HEADER;
use catalog_auth::SessionManager;
use catalog_core::config::AppConfig;
use catalog_core::types::SchemaCapabilities;
use catalog_database::RoleStore;
use catalog_database::memory::MemoryCatalog;
use catalog_entity::user::UserRole;
use catalog_service::{CapabilityCache, CategoryService, ProductService};
use catalog_storage::ImageGateway;
use catalog_storage::providers::LocalObjectStore;

/// Secret shared between the test token issuer and the server.
pub const TOKEN_SECRET: &str = "catalog-test-secret";

/// Image size limit used by the test server.
pub const MAX_IMAGE_BYTES: u64 = 1024;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for seeding and fault injection
    pub store: MemoryCatalog,
    /// Application config
    pub config: AppConfig,
    _storage_dir: TempDir,
}

impl TestApp {
    /// Create a test application over a fully migrated schema
    pub async fn new() -> Self {
        Self::with_schema(SchemaCapabilities::full()).await
    }

    /// Create a test application over the given schema
    pub async fn with_schema(schema: SchemaCapabilities) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.auth.jwt_secret = TOKEN_SECRET.to_string();
        config.storage.max_image_bytes = MAX_IMAGE_BYTES;
        config.storage.local.root_path = storage_dir.path().to_string_lossy().into_owned();

        let local = LocalObjectStore::new(
            &config.storage.local.root_path,
            &config.storage.local.public_base_url,
        )
        .await
        .expect("Failed to init local storage");
        local
            .ensure_bucket(&config.storage.bucket)
            .await
            .expect("Failed to create bucket");
        let media_root = local.root().to_path_buf();
        let images = Arc::new(ImageGateway::new(Arc::new(local), &config.storage));

        let store = MemoryCatalog::with_schema(schema);
        let shared = Arc::new(store.clone());
        let capabilities = Arc::new(CapabilityCache::new(shared.clone()));

        let state = AppState {
            config: Arc::new(config.clone()),
            categories: Arc::new(CategoryService::new(
                shared.clone(),
                shared.clone(),
                Arc::clone(&capabilities),
            )),
            products: Arc::new(ProductService::new(
                shared.clone(),
                shared.clone(),
                Arc::clone(&capabilities),
                Arc::clone(&images),
            )),
            capabilities,
            images,
            sessions: Arc::new(SessionManager::new(&config.auth, shared)),
            media_root: Some(media_root),
            started_at: Instant::now(),
        };

        Self {
            router: catalog_api::build_app(state),
            store,
            config,
            _storage_dir: storage_dir,
        }
    }

    /// Issue an identity token for `user_id`
    pub fn token(user_id: Uuid) -> String {
        let now = chrono::Utc::now().timestamp();
        jsonwebtoken::encode(
            &Header::default(),
            &json!({ "sub": user_id, "iat": now, "exp": now + 3600 }),
            &EncodingKey::from_secret(TOKEN_SECRET.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Grant a fresh user the admin role and open a session for them
    pub async fn admin_session(&self) -> String {
        let user_id = Uuid::new_v4();
        self.store
            .assign_role(user_id, UserRole::Admin)
            .await
            .expect("Failed to assign role");

        let response = self.sign_in(&Self::token(user_id)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["session_id"]
            .as_str()
            .expect("Missing session_id")
            .to_string()
    }

    /// POST /api/admin/session with a bearer token
    pub async fn sign_in(&self, token: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/api/admin/session")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Make a JSON request, optionally with an admin session
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(session) = session {
            req = req.header(ADMIN_SESSION_HEADER, session);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request through the router
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            raw: body_bytes.to_vec(),
        }
    }

    /// Create a category through the admin API and return its ID
    pub async fn create_category(&self, session: &str, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/admin/categories",
                Some(json!({ "name": name, "parent_id": parent })),
                Some(session),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("Missing id")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}
