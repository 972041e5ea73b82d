// handlers/protected/work_confirmations/get.rs - GET /api/work-confirmations/:id

use axum::extract::{Extension, Path};

use super::{find_or_404, visibility};
use crate::database::models::WorkConfirmation;
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::WorkConfirmationService;

/// Forms outside the caller's list visibility are reported as missing.
pub async fn get_by_id(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<WorkConfirmation> {
    let id = parse_uuid(&id)?;
    let record = find_or_404(&WorkConfirmationService::new(pool.clone()), id).await?;

    let scope = visibility(&pool, &user, None).await?;
    if !scope.can_view(record.created_by) {
        return Err(ApiError::not_found("Work confirmation not found"));
    }

    Ok(ApiResponse::success(record))
}
