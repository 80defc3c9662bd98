//! Catalog Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::{EnvFilter, fmt};

use catalog_api::AppState;
use catalog_auth::SessionManager;
use catalog_core::config::{AppConfig, StorageConfig, StorageProviderKind};
use catalog_core::error::AppError;
use catalog_core::traits::ObjectStore;
use catalog_database::DatabasePool;
use catalog_database::repositories::{
    CategoryRepository, ProductRepository, RoleRepository, SchemaRepository,
};
use catalog_service::{CapabilityCache, CategoryService, ProductService};
use catalog_storage::ImageGateway;
use catalog_storage::providers::{self, LocalObjectStore};

/// How often expired admin sessions are dropped.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `CATALOG_CONFIG` or the `CATALOG_ENV` layers
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("CATALOG_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("CATALOG_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting catalog server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection ──────────────────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::open(&config.database).await?.into_pool();

    // ── Step 2: Image storage ────────────────────────────────────
    let (object_store, media_root) = build_object_store(&config.storage).await?;
    let images = Arc::new(ImageGateway::new(object_store, &config.storage));
    tracing::info!(
        provider = images.provider_type(),
        bucket = images.bucket(),
        "Image storage initialized"
    );

    // ── Step 3: Repositories and schema capabilities ─────────────
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let product_repo = Arc::new(ProductRepository::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
    let capabilities = Arc::new(CapabilityCache::new(Arc::new(SchemaRepository::new(
        db_pool.clone(),
    ))));

    // Probe once up front so missing migrations show in the startup log.
    let detected = capabilities.current().await;
    for gap in detected.missing() {
        tracing::warn!(column = %gap, migration = gap.migration(), "{}", gap.remediation());
    }

    // ── Step 4: Services ─────────────────────────────────────────
    let categories = Arc::new(CategoryService::new(
        category_repo.clone(),
        product_repo.clone(),
        Arc::clone(&capabilities),
    ));
    let products = Arc::new(ProductService::new(
        product_repo,
        category_repo,
        Arc::clone(&capabilities),
        Arc::clone(&images),
    ));
    let sessions = Arc::new(SessionManager::new(&config.auth, role_repo));
    spawn_session_purge(Arc::clone(&sessions));

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        categories,
        products,
        capabilities,
        images,
        sessions,
        media_root,
        started_at: Instant::now(),
    };

    let app = catalog_api::build_app(state);
    let result = catalog_api::serve(app, &config.server).await;

    db_pool.close().await;
    result
}

/// Build the configured object store. The local provider also gets its
/// bucket directory created and is served under `/media`.
async fn build_object_store(
    config: &StorageConfig,
) -> Result<(Arc<dyn ObjectStore>, Option<PathBuf>), AppError> {
    match config.provider {
        StorageProviderKind::Local => {
            let store =
                LocalObjectStore::new(&config.local.root_path, &config.local.public_base_url)
                    .await?;
            store.ensure_bucket(&config.bucket).await?;
            let root = store.root().to_path_buf();
            Ok((Arc::new(store), Some(root)))
        }
        StorageProviderKind::Http => Ok((providers::from_config(config).await?, None)),
    }
}

fn spawn_session_purge(sessions: Arc<SessionManager>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            sessions.purge_expired();
        }
    });
}
