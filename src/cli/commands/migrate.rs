use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::schema;
use crate::services::TenantService;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    schema::ensure_main_schema().await?;

    let service = TenantService::new().await?;
    let migrated = service.migrate_all().await?;

    output_success(
        &output_format,
        &format!("Migrated main schema and {} tenant(s)", migrated.len()),
        Some(json!({ "tenants": migrated })),
    )
}
