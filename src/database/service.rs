use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::tenant::Tenant;

const TENANT_COLUMNS: &str = "id, name, database, is_active, created_at, updated_at, deleted_at";

/// Look up an active tenant in the main database by its public name
pub async fn find_active_tenant_by_name(tenant_name: &str) -> Result<Option<Tenant>, DatabaseError> {
    let pool = DatabaseManager::main_pool().await?;

    let tenant = sqlx::query_as::<_, Tenant>(&format!(
        "SELECT {TENANT_COLUMNS} FROM tenants
         WHERE name = $1 AND is_active = true AND deleted_at IS NULL"
    ))
    .bind(tenant_name)
    .fetch_optional(&pool)
    .await?;

    Ok(tenant)
}

/// Look up an active tenant in the main database by its database name (as carried in JWT claims)
pub async fn find_active_tenant_by_database(database: &str) -> Result<Option<Tenant>, DatabaseError> {
    let pool = DatabaseManager::main_pool().await?;

    let tenant = sqlx::query_as::<_, Tenant>(&format!(
        "SELECT {TENANT_COLUMNS} FROM tenants
         WHERE database = $1 AND is_active = true AND deleted_at IS NULL"
    ))
    .bind(database)
    .fetch_optional(&pool)
    .await?;

    Ok(tenant)
}
