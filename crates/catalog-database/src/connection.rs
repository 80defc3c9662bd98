//! Catalog database connection: pool setup, startup migrations and the
//! reachability round trip used by health reporting.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use catalog_core::config::DatabaseConfig;
use catalog_core::error::{AppError, ErrorKind};

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            run_migrations = config.run_migrations,
            "Connecting to catalog database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Repository,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Connected to catalog database");
        Ok(Self { pool })
    }

    /// Connect and, when `run_migrations` is set, bring the schema up to
    /// date before any statement runs.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let database = Self::connect(config).await?;
        if config.run_migrations {
            crate::migration::run_migrations(&database.pool).await?;
        } else {
            info!("Automatic migrations disabled; run `catalog-cli migrate run` to apply them");
        }
        Ok(database)
    }

    /// Return the underlying sqlx pool (consuming self).
    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

/// One round trip to the database. Any failure is a transient
/// `Repository` error.
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            AppError::with_source(ErrorKind::Repository, format!("Database unreachable: {e}"), e)
        })
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
