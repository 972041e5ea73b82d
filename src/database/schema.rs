use sqlx::{Executor, PgPool};
use tracing::info;

use crate::database::manager::{DatabaseError, DatabaseManager};

/// Tenant registry DDL, applied to the main database.
pub const MAIN_SCHEMA: &str = include_str!("sql/main.sql");

/// Per-tenant tables.
pub const TENANT_SCHEMA: &str = include_str!("sql/tenant.sql");

/// Create the tenant registry if it does not exist yet.
pub async fn ensure_main_schema() -> Result<(), DatabaseError> {
    let pool = DatabaseManager::main_pool().await?;
    // Multi-statement text goes over the simple query protocol
    pool.execute(MAIN_SCHEMA).await?;
    info!("Main schema ready in {}", DatabaseManager::main_database_name());
    Ok(())
}

/// Apply the tenant tables to an already-connected tenant pool.
pub async fn apply_tenant_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    pool.execute(TENANT_SCHEMA).await?;
    Ok(())
}
