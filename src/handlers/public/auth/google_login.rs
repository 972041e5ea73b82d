// handlers/public/auth/google_login.rs - GET /auth/google/login

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use serde::{Deserialize, Serialize};

use crate::auth::oauth::{DeviceInfo, GoogleOAuth, OAuthState};
use crate::database::service::find_active_tenant_by_name;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct GoogleLoginQuery {
    pub tenant: Option<String>,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub browser_name: String,
    #[serde(default)]
    pub platform: String,
}

impl GoogleLoginQuery {
    fn device(&self) -> DeviceInfo {
        DeviceInfo {
            device_id: self.device_id.clone(),
            device_name: self.device_name.clone(),
            browser_name: self.browser_name.clone(),
            platform: self.platform.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GoogleLoginResponse {
    pub oauth_url: String,
}

/**
 * GET /auth/google/login?tenant=acme&device_id=...&device_name=...&browser_name=...&platform=...
 *
 * Returns the Google consent URL. The tenant and device fields travel inside the signed `state`
 * parameter and come back to `/auth/google/callback` untouched.
 *
 * Output:
 * ```json
 * { "success": true, "data": { "oauth_url": "https://accounts.google.com/o/oauth2/auth?..." } }
 * ```
 */
pub async fn google_login_get(
    query: Result<Query<GoogleLoginQuery>, QueryRejection>,
) -> ApiResult<GoogleLoginResponse> {
    let Query(query) = query?;
    let tenant_name = query
        .tenant
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::invalid_field("tenant", "Tenant is required"))?;

    let google = GoogleOAuth::from_config()?;

    let tenant = find_active_tenant_by_name(tenant_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Tenant not found"))?;

    let state = OAuthState::new(tenant.name, query.device()).encode()?;
    let oauth_url = google.authorization_url(&state)?;

    Ok(ApiResponse::success(GoogleLoginResponse { oauth_url }))
}
