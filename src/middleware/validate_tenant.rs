use axum::{extract::Request, middleware::Next, response::Response};
use sqlx::PgPool;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::database::manager::DatabaseManager;
use crate::database::service::find_active_tenant_by_database;
use crate::error::ApiError;

/// Extracted tenant database pool, injected by middleware
#[derive(Clone)]
pub struct TenantPool(pub PgPool);

/// Tenant row from the main registry that the caller's token points at
#[derive(Clone, Debug)]
pub struct ValidatedTenant {
    pub id: Uuid,
    pub name: String,
    pub database: String,
}

/// Middleware that validates the tenant from JWT claims against the tenant registry.
/// Ensures the tenant exists and is active (not deleted).
pub async fn validate_tenant_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before tenant validation"))?
        .clone();

    let tenant = find_active_tenant_by_database(&auth_user.database)
        .await?
        .filter(|tenant| tenant.name == auth_user.tenant)
        .ok_or_else(|| {
            tracing::warn!("Tenant validation failed: tenant '{}' not found or inactive", auth_user.database);
            ApiError::forbidden(format!("Tenant '{}' is not active or does not exist", auth_user.tenant))
        })?;

    let validated_tenant = ValidatedTenant {
        id: tenant.id,
        name: tenant.name,
        database: tenant.database,
    };

    tracing::debug!("Tenant validation successful: {} ({})", validated_tenant.name, validated_tenant.database);

    let tenant_pool = DatabaseManager::tenant_pool(&validated_tenant.database)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get database pool for tenant '{}': {}", validated_tenant.database, e);
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(validated_tenant);
    request.extensions_mut().insert(TenantPool(tenant_pool));

    Ok(next.run(request).await)
}
