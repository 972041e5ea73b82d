// handlers/protected/teams/add_employee.rs - POST /api/teams/add-employee

use axum::extract::{rejection::JsonRejection, Extension};
use axum::Json;

use super::AddEmployeeRequest;
use crate::database::models::TeamEmployee;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::{TeamService, UserService};

/**
 * POST /api/teams/add-employee - Put an existing user on the caller's team
 *
 * Input: `{ "email": "employee@company.com" }`
 *
 * The user must exist and must not be the caller. A user who is already on the team is
 * rejected; the membership insert itself refuses duplicates, so two racing requests cannot
 * both succeed.
 */
pub async fn add_employee_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<AddEmployeeRequest>, JsonRejection>,
) -> ApiResult<TeamEmployee> {
    let email = AddEmployeeRequest::from_payload(payload)?;

    let employee = UserService::new(pool.clone())
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if employee.id == user.id {
        return Err(ApiError::bad_request("Cannot add yourself to your team"));
    }

    let member = TeamService::new(pool)
        .add_member(user.id, employee.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Employee already in your team"))?;

    tracing::info!("Manager {} added {} to their team", user.id, employee.id);
    Ok(ApiResponse::created(member))
}
