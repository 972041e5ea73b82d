// handlers/protected/teams/my_employees.rs - GET /api/teams/my-employees[/:employee_id]

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Path, Query};

use crate::database::models::TeamEmployee;
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::TeamService;
use crate::types::{Page, PageQuery};

/// Paginated, most recently joined first
pub async fn my_employees_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<TeamEmployee>> {
    let Query(query) = query?;
    let pagination = query.resolve();
    let (employees, total) = TeamService::new(pool).list_members(user.id, pagination).await?;
    Ok(ApiResponse::success(Page::new(employees, total, pagination)))
}

pub async fn my_employee_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(employee_id): Path<String>,
) -> ApiResult<TeamEmployee> {
    let employee_id = parse_uuid(&employee_id)?;

    let employee = TeamService::new(pool)
        .find_member(user.id, employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found in your team"))?;

    Ok(ApiResponse::success(employee))
}
