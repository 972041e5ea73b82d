use axum::extract::Extension;

use crate::database::models::user::Profile;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

/// GET /api/profile
pub async fn profile_get(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<Profile> {
    Ok(ApiResponse::success(user.profile()))
}
