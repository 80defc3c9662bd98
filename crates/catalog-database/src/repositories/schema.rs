//! Live schema inspection.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use catalog_core::result::AppResult;
use catalog_core::types::{SchemaCapabilities, SchemaGap};

use super::map_db_error;
use crate::store::SchemaProbe;

/// Reads `information_schema` to find which optional columns exist.
#[derive(Debug, Clone)]
pub struct SchemaRepository {
    pool: PgPool,
}

impl SchemaRepository {
    /// Create a new schema repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaProbe for SchemaRepository {
    async fn probe_capabilities(&self) -> AppResult<SchemaCapabilities> {
        let tables: Vec<&str> = SchemaGap::ALL.iter().map(|gap| gap.table()).collect();
        let columns: Vec<&str> = SchemaGap::ALL.iter().map(|gap| gap.column()).collect();

        let present = sqlx::query_as::<_, (String, String)>(
            "SELECT table_name::text, column_name::text FROM information_schema.columns \
             WHERE table_schema = current_schema() \
             AND table_name = ANY($1) AND column_name = ANY($2)",
        )
        .bind(&tables)
        .bind(&columns)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to inspect schema", None))?;

        let mut caps = SchemaCapabilities::full();
        for gap in SchemaGap::ALL {
            let found = present
                .iter()
                .any(|(table, column)| table == gap.table() && column == gap.column());
            if !found {
                caps = caps.without(gap);
            }
        }

        debug!(?caps, "Probed schema capabilities");
        Ok(caps)
    }

    async fn ping(&self) -> AppResult<()> {
        crate::connection::ping(&self.pool).await
    }
}
