//! CLI command definitions and dispatch.

pub mod admin;
pub mod migrate;
pub mod probe;

use clap::{Parser, Subcommand};

use catalog_core::config::AppConfig;
use catalog_core::error::AppError;
use catalog_database::DatabasePool;

use crate::output::OutputFormat;

/// Product catalog operator tools
#[derive(Debug, Parser)]
#[command(name = "catalog-cli", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; defaults to `config/default.toml` overlaid with
    /// `config/$CATALOG_ENV.toml`
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin role management
    Admin(admin::AdminArgs),
    /// Report schema capabilities and image bucket status
    Probe,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::Admin(args) => admin::execute(args, &config, self.format).await,
            Commands::Probe => probe::execute(&config, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the environment
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("CATALOG_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
