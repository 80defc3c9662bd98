//! Schema capability and image bucket report.

use serde::Serialize;
use tabled::Tabled;

use catalog_core::config::AppConfig;
use catalog_core::error::AppError;
use catalog_core::types::{SchemaCapabilities, SchemaGap};
use catalog_database::SchemaProbe;
use catalog_database::repositories::SchemaRepository;
use catalog_storage::{BucketStatus, ImageGateway, StorageUsage, providers};

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct ColumnRow {
    column: String,
    present: bool,
    migration: String,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    capabilities: SchemaCapabilities,
    bucket: String,
    provider: String,
    bucket_status: BucketStatus,
    usage: Option<StorageUsage>,
}

/// Probe the database schema and the image bucket.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let capabilities = SchemaRepository::new(pool.clone()).probe_capabilities().await?;
    pool.close().await;

    let gateway = ImageGateway::new(providers::from_config(&config.storage).await?, &config.storage);
    let bucket_status = gateway.probe_bucket().await;
    let usage = match bucket_status {
        BucketStatus::Exists => gateway.usage().await?,
        BucketStatus::Missing | BucketStatus::Unknown => None,
    };

    let report = ProbeReport {
        capabilities,
        bucket: gateway.bucket().to_string(),
        provider: gateway.provider_type().to_string(),
        bucket_status,
        usage,
    };

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => print_report(&report, format),
    }
    Ok(())
}

fn print_report(report: &ProbeReport, format: OutputFormat) {
    let rows: Vec<ColumnRow> = SchemaGap::ALL
        .into_iter()
        .map(|gap| ColumnRow {
            column: gap.to_string(),
            present: report.capabilities.supports(gap),
            migration: gap.migration().to_string(),
        })
        .collect();
    output::print_list(&rows, format);

    println!();
    output::print_kv("Bucket", &report.bucket);
    output::print_kv("Provider", &report.provider);
    output::print_kv("Status", &report.bucket_status.to_string());
    if let Some(usage) = report.usage {
        output::print_kv("Objects", &usage.file_count.to_string());
        output::print_kv("Total bytes", &usage.total_bytes.to_string());
    }

    for gap in report.capabilities.missing() {
        output::print_warning(&gap.remediation());
    }
    if report.bucket_status == BucketStatus::Missing {
        output::print_warning(&format!(
            "Bucket '{}' does not exist; create it as a public-read bucket before uploading images.",
            report.bucket
        ));
    }
}
