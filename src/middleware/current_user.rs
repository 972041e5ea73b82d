use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use super::validate_tenant::TenantPool;
use crate::database::models::User;
use crate::error::ApiError;
use crate::services::user_service::UserService;

/// The caller's user row, freshly loaded from the tenant database.
/// Roles are always taken from here, never from the token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that loads the user named by the JWT from the tenant's users table
pub async fn current_user_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?
        .clone();

    let TenantPool(tenant_pool) = request
        .extensions()
        .get::<TenantPool>()
        .ok_or_else(|| ApiError::internal_server_error("Tenant pool required before user validation"))?
        .clone();

    let user = UserService::new(tenant_pool)
        .find_by_id_any(auth_user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User {} from token not found in tenant '{}'", auth_user.user_id, auth_user.tenant);
            ApiError::unauthorized("Invalid user")
        })?;

    if user.is_deleted() {
        tracing::warn!("Deleted user {} attempted access in tenant '{}'", user.id, auth_user.tenant);
        return Err(ApiError::forbidden("Account has been deleted"));
    }

    tracing::debug!("User validation successful: {} ({}) in tenant '{}'", user.email, user.role, auth_user.tenant);

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
