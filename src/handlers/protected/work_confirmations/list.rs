// handlers/protected/work_confirmations/list.rs - GET /api/work-confirmations

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use serde::Deserialize;

use super::visibility;
use crate::database::models::{WorkConfirmation, WorkConfirmationStatus};
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::WorkConfirmationService;
use crate::types::{Page, PageQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub created_by: Option<String>,
}

/// GET /api/work-confirmations - Paginated, newest first.
///
/// Employees see their own forms, managers add their team's, leaders and assistant directors
/// see everything. `created_by` narrows the list and must stay inside that visibility.
pub async fn list_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Page<WorkConfirmation>> {
    let Query(query) = query?;
    let pagination = PageQuery { page: query.page, limit: query.limit }.resolve();

    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<WorkConfirmationStatus>()
                .map_err(|_| ApiError::invalid_field("status", "Invalid status"))?,
        ),
        None => None,
    };

    let requested_creator = match query.created_by.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_uuid(raw)?),
        None => None,
    };

    let scope = visibility(&pool, &user, requested_creator).await?;
    let (records, total) = WorkConfirmationService::new(pool)
        .list(scope.creator_filter(), status, pagination)
        .await?;

    Ok(ApiResponse::success(Page::new(records, total, pagination)))
}
