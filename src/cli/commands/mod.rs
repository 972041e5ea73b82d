pub mod migrate;
pub mod tenant;
pub mod token;
pub mod user;

use anyhow::Context;
use sqlx::PgPool;

use crate::services::TenantService;

/// Resolve a tenant name to its database pool
pub(crate) async fn tenant_pool(tenant: &str) -> anyhow::Result<PgPool> {
    let service = TenantService::new().await.context("Failed to connect to the main database")?;
    service
        .get_tenant_pool(tenant)
        .await
        .with_context(|| format!("Tenant '{}' is not available", tenant))
}
