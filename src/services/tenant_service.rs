use sha2::{Digest, Sha256};
use std::future::Future;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Tenant;
use crate::database::schema;

const TENANT_COLUMNS: &str = "id, name, database, is_active, created_at, updated_at, deleted_at";

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Tenant already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid tenant name: {0}")]
    InvalidName(String),
    #[error("Tenant not found: {0}")]
    NotFound(String),
    #[error("Database manager error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Tenant registry operations against the main database
pub struct TenantService {
    main_pool: PgPool,
}

impl TenantService {
    pub async fn new() -> Result<Self, TenantError> {
        let main_pool = DatabaseManager::main_pool().await?;
        Ok(Self { main_pool })
    }

    /// Create the tenant database, apply the tenant tables, then register the tenant.
    ///
    /// The database is dropped again when a later step fails, so a failed create can be retried.
    pub async fn create_tenant(&self, tenant_name: &str) -> Result<Tenant, TenantError> {
        validate_tenant_name(tenant_name)?;

        if self.tenant_exists(tenant_name).await? {
            return Err(TenantError::AlreadyExists(tenant_name.to_string()));
        }

        let tenant_db = hash_tenant_name(tenant_name);
        if DatabaseManager::database_exists(&tenant_db).await? {
            // unregistered, so left behind by an interrupted create
            warn!("Dropping unregistered database {} before creating tenant {}", tenant_db, tenant_name);
            DatabaseManager::drop_database(&tenant_db).await?;
        }
        DatabaseManager::create_database(&tenant_db).await?;

        let tenant = provision_or_rollback(
            self.provision_tenant(tenant_name, &tenant_db),
            DatabaseManager::drop_database(&tenant_db),
        )
        .await?;

        info!("Registered tenant {} -> {}", tenant.name, tenant.database);
        Ok(tenant)
    }

    async fn provision_tenant(&self, tenant_name: &str, tenant_db: &str) -> Result<Tenant, TenantError> {
        let pool = DatabaseManager::tenant_pool(tenant_db).await?;
        schema::apply_tenant_schema(&pool).await?;
        self.register_tenant(tenant_name, tenant_db).await
    }

    async fn tenant_exists(&self, tenant_name: &str) -> Result<bool, TenantError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tenants WHERE name = $1 AND deleted_at IS NULL")
            .bind(tenant_name)
            .fetch_one(&self.main_pool)
            .await?;
        Ok(count > 0)
    }

    async fn register_tenant(&self, tenant_name: &str, tenant_db: &str) -> Result<Tenant, TenantError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "INSERT INTO tenants (id, name, database, is_active)
             VALUES ($1, $2, $3, true)
             RETURNING {TENANT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(tenant_name)
        .bind(tenant_db)
        .fetch_one(&self.main_pool)
        .await?;
        Ok(tenant)
    }

    pub async fn get_tenant(&self, tenant_name: &str) -> Result<Option<Tenant>, TenantError> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(tenant_name)
        .fetch_optional(&self.main_pool)
        .await?;
        Ok(tenant)
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>, TenantError> {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(&self.main_pool)
        .await?;
        Ok(tenants)
    }

    /// Connection pool for a registered tenant's database
    pub async fn get_tenant_pool(&self, tenant_name: &str) -> Result<PgPool, TenantError> {
        let tenant = self
            .get_tenant(tenant_name)
            .await?
            .ok_or_else(|| TenantError::NotFound(tenant_name.to_string()))?;

        Ok(DatabaseManager::tenant_pool(&tenant.database).await?)
    }

    /// Re-apply the tenant tables to every registered tenant. Returns the names that were migrated.
    pub async fn migrate_all(&self) -> Result<Vec<String>, TenantError> {
        let mut migrated = Vec::new();
        for tenant in self.list_tenants().await? {
            match DatabaseManager::tenant_pool(&tenant.database).await {
                Ok(pool) => {
                    schema::apply_tenant_schema(&pool).await?;
                    migrated.push(tenant.name);
                }
                Err(e) => warn!("Skipping tenant {}: {}", tenant.name, e),
            }
        }
        Ok(migrated)
    }
}

/// Await `provision`; on failure await `rollback` and return the provisioning error.
async fn provision_or_rollback<T>(
    provision: impl Future<Output = Result<T, TenantError>>,
    rollback: impl Future<Output = Result<(), DatabaseError>>,
) -> Result<T, TenantError> {
    match provision.await {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Tenant provisioning failed, rolling back: {}", e);
            if let Err(rollback_err) = rollback.await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Tenant name to database name: `tenant_` plus the first 16 hex chars of its SHA-256
pub fn hash_tenant_name(name: &str) -> String {
    let hash = format!("{:x}", Sha256::digest(name.as_bytes()));
    format!("tenant_{}", &hash[..16])
}

pub fn validate_tenant_name(name: &str) -> Result<(), TenantError> {
    if name.len() < 2 {
        return Err(TenantError::InvalidName("Tenant name must be at least 2 characters".to_string()));
    }

    if name.len() > 100 {
        return Err(TenantError::InvalidName("Tenant name must be less than 100 characters".to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(TenantError::InvalidName(
            "Tenant name can only contain letters, numbers, hyphens, and underscores".to_string(),
        ));
    }

    Ok(())
}
