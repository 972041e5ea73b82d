// handlers/public/auth/google_callback.rs - GET /auth/google/callback

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::response::Redirect;
use serde::Deserialize;

use crate::auth::oauth::{GoogleOAuth, GoogleUserInfo, OAuthState};
use crate::auth::{generate_jwt, Claims};
use crate::database::models::{Role, User};
use crate::database::service::find_active_tenant_by_name;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::services::{NewUser, UserService};

const PROVIDER: &str = "google";

#[derive(Debug, Default, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error_reason: Option<String>,
}

/**
 * GET /auth/google/callback?code=...&state=...
 *
 * 1. Verify `state` and recover the tenant it was issued for
 * 2. Exchange `code` with Google and fetch the profile
 * 3. Find the user by email in the tenant, creating an employee on first sign-in
 * 4. Issue our JWT and redirect the browser to the client with `?access_token=`
 *
 * Deleted accounts are refused even though Google vouches for the email.
 */
pub async fn google_callback_get(
    query: Result<Query<GoogleCallbackQuery>, QueryRejection>,
) -> Result<Redirect, ApiError> {
    let Query(query) = query?;
    let code = query.code.as_deref().map(str::trim).filter(|c| !c.is_empty()).ok_or_else(|| {
        if let Some(reason) = &query.error_reason {
            tracing::info!("Google sign-in aborted: {}", reason);
        }
        ApiError::bad_request("Missing authorization code")
    })?;

    let state = OAuthState::decode(query.state.as_deref().unwrap_or_default())?;
    let google = GoogleOAuth::from_config()?;

    let tenant = find_active_tenant_by_name(&state.tenant)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    let google_token = google.exchange_code(code).await?;
    let info = google.fetch_user_info(&google_token).await?;

    let pool = DatabaseManager::tenant_pool(&tenant.database).await?;
    let user = find_or_create_user(&UserService::new(pool), &info).await?;

    tracing::info!(
        "Google sign-in for {} in tenant '{}' (device '{}' on '{}')",
        user.email,
        tenant.name,
        state.device.device_name,
        state.device.platform
    );

    let claims = Claims::new(tenant.name, tenant.database, user.id, user.email);
    let access_token = generate_jwt(claims)?;

    Ok(Redirect::temporary(&google.client_redirect(&access_token)?))
}

async fn find_or_create_user(users: &UserService, info: &GoogleUserInfo) -> Result<User, ApiError> {
    match users.find_by_email_any(&info.email).await? {
        Some(user) if user.is_deleted() => {
            tracing::warn!("Deleted account {} attempted Google sign-in", user.email);
            Err(ApiError::forbidden("Account has been deleted"))
        }
        Some(user) if user.oauth_provider_id.is_none() => Ok(users.link_oauth(user.id, PROVIDER, &info.id).await?),
        Some(user) => Ok(user),
        None => {
            let user = users
                .create(NewUser {
                    full_name: info.name.clone(),
                    email: info.email.trim().to_string(),
                    avatar: info.picture.clone(),
                    role: Role::Employee,
                    is_verify_email: true,
                    oauth_provider: Some(PROVIDER.to_string()),
                    oauth_provider_id: Some(info.id.clone()),
                    ..Default::default()
                })
                .await?;
            tracing::info!("Created user {} from Google profile", user.email);
            Ok(user)
        }
    }
}
