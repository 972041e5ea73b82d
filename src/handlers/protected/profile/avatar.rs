use axum::extract::{Extension, Multipart};

use crate::database::models::user::Profile;
use crate::error::ApiError;
use crate::handlers::utils::{upload_images, MultipartForm};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool, ValidatedTenant};
use crate::services::UserService;
use crate::storage;

/// POST /api/profile/avatar - Multipart `avatar` image; returns the updated profile
pub async fn avatar_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(tenant): Extension<ValidatedTenant>,
    multipart: Multipart,
) -> ApiResult<Profile> {
    let form = MultipartForm::read(multipart).await?;

    let file = form
        .files("avatar")
        .next()
        .ok_or_else(|| ApiError::invalid_field("avatar", "avatar is required"))?;
    if !file.is_image() {
        return Err(ApiError::invalid_field("avatar", "File must be an image"));
    }

    let photo = upload_images(&tenant, "avatars", user.id, [file])
        .await
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal_server_error("Failed to upload avatar"))?;

    let updated = UserService::new(pool).update_avatar(user.id, &photo.url).await?;
    tracing::info!("User {} changed avatar to {}", user.id, photo.url);

    if user.avatar != photo.url {
        remove_previous_avatar(&tenant, &user.avatar).await;
    }
    Ok(ApiResponse::success(updated.profile()))
}

/// Best effort. Google profile pictures and other external URLs are left alone.
async fn remove_previous_avatar(tenant: &ValidatedTenant, url: &str) {
    let Some((bucket, key)) = storage::split_object_path(url) else {
        return;
    };
    if !key.starts_with(&format!("{}/avatars/", tenant.database)) {
        return;
    }
    if let Err(e) = storage::store().delete(bucket, key).await {
        tracing::warn!("Could not remove old avatar {}: {}", url, e);
    }
}
