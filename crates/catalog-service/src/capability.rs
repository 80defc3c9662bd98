//! Schema capability cache and degrade-retry negotiation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use catalog_core::error::AppError;
use catalog_core::result::AppResult;
use catalog_core::types::{SchemaCapabilities, SchemaGap};
use catalog_database::store::SchemaProbe;

/// Process-wide record of which optional columns the database has.
///
/// Probed lazily on first use and refreshed on demand. A statement that
/// hits a missing column downgrades the cached value for the rest of the
/// process.
#[derive(Debug)]
pub struct CapabilityCache {
    probe: Arc<dyn SchemaProbe>,
    cached: RwLock<Option<SchemaCapabilities>>,
}

impl CapabilityCache {
    /// Create an empty cache backed by `probe`.
    pub fn new(probe: Arc<dyn SchemaProbe>) -> Self {
        Self {
            probe,
            cached: RwLock::new(None),
        }
    }

    /// Create a cache pre-seeded with known capabilities.
    pub fn with_capabilities(probe: Arc<dyn SchemaProbe>, capabilities: SchemaCapabilities) -> Self {
        Self {
            probe,
            cached: RwLock::new(Some(capabilities)),
        }
    }

    /// Current capabilities, probing the database on first use.
    ///
    /// If the probe itself fails the schema is assumed complete and nothing
    /// is cached, so the next call probes again; statements that then hit a
    /// missing column still degrade through [`negotiate`](Self::negotiate).
    pub async fn current(&self) -> SchemaCapabilities {
        if let Some(caps) = *self.cached.read().await {
            return caps;
        }
        match self.refresh().await {
            Ok(caps) => caps,
            Err(e) => {
                warn!(error = %e, "Schema probe failed; assuming a fully migrated schema");
                SchemaCapabilities::full()
            }
        }
    }

    /// The cached value without probing.
    pub async fn peek(&self) -> Option<SchemaCapabilities> {
        *self.cached.read().await
    }

    /// Whether the database answers a round trip right now.
    pub async fn store_reachable(&self) -> bool {
        match self.probe.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                false
            }
        }
    }

    /// Probe the database again and replace the cached value.
    pub async fn refresh(&self) -> AppResult<SchemaCapabilities> {
        let caps = self.probe.probe_capabilities().await?;
        *self.cached.write().await = Some(caps);
        let missing: Vec<String> = caps.missing().iter().map(ToString::to_string).collect();
        info!(?missing, "Schema capabilities detected");
        Ok(caps)
    }

    /// Record that the column behind `gap` is absent.
    pub async fn downgrade(&self, gap: SchemaGap) {
        let mut cached = self.cached.write().await;
        let current = cached.unwrap_or_default();
        if current.supports(gap) {
            warn!(
                column = %gap,
                migration = gap.migration(),
                "Database lacks optional column; {} disabled until migrated",
                gap.capability()
            );
        }
        *cached = Some(current.without(gap));
    }

    /// Record the gap a failed statement reports, if any, and hand the
    /// error back.
    pub async fn observe(&self, err: AppError) -> AppError {
        if let Some(gap) = err.schema_gap {
            if err.requires_migration() {
                self.downgrade(gap).await;
            }
        }
        err
    }

    /// Run a statement that may name the optional column behind `gap`.
    ///
    /// `op` receives whether the column may be used. When the column is
    /// believed present and the database rejects it, the cache is
    /// downgraded and `op` runs exactly once more without it. Any other
    /// failure is returned unchanged.
    pub async fn negotiate<T, F, Fut>(&self, gap: SchemaGap, op: F) -> AppResult<T>
    where
        F: Fn(bool) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if !self.current().await.supports(gap) {
            return op(false).await;
        }
        match op(true).await {
            Err(e) if e.is_schema_gap(gap) => {
                self.downgrade(gap).await;
                warn!(column = %gap, "Retrying statement without optional column");
                op(false).await
            }
            result => result,
        }
    }
}
