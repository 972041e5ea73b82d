use axum::extract::{rejection::JsonRejection, Extension};
use axum::Json;
use serde::Deserialize;

use crate::database::models::user::Profile;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

/// PUT /api/profile - Blank fields keep their current value
pub async fn profile_put(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(request) = payload?;

    let full_name = request.full_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let phone_number = request.phone_number.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let updated = UserService::new(pool)
        .update_profile(user.id, full_name, phone_number)
        .await?;
    Ok(ApiResponse::success(updated.profile()))
}
