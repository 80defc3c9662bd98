//! Application state shared across all handlers and middleware.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use catalog_auth::SessionManager;
use catalog_core::config::AppConfig;
use catalog_service::{CapabilityCache, CategoryService, ProductService};
use catalog_storage::ImageGateway;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Category tree operations.
    pub categories: Arc<CategoryService>,
    /// Product operations.
    pub products: Arc<ProductService>,
    /// Cached schema capabilities.
    pub capabilities: Arc<CapabilityCache>,
    /// Managed image bucket.
    pub images: Arc<ImageGateway>,
    /// Open admin sessions.
    pub sessions: Arc<SessionManager>,
    /// Directory served under `/media` when images are stored locally.
    pub media_root: Option<PathBuf>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Seconds since the state was built.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
