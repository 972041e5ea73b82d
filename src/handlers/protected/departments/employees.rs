// handlers/protected/departments/employees.rs - /api/teams/:id/employees and membership changes

use axum::extract::rejection::QueryRejection;
use axum::extract::{rejection::JsonRejection, Extension, Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::load_team;
use crate::database::models::{Team, TeamEmployee};
use crate::error::ApiError;
use crate::handlers::protected::teams::AddEmployeeRequest;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{TeamService, UserService};
use crate::types::{Page, PageQuery};

fn manager_of(team: &Team) -> Result<Uuid, ApiError> {
    team.manager_id
        .ok_or_else(|| ApiError::bad_request("Team has no manager assigned"))
}

/// A department without a manager has no employees, so it gets an empty page
pub async fn employees_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path(id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<TeamEmployee>> {
    let Query(query) = query?;
    let pagination = query.resolve();
    let teams = TeamService::new(pool);
    let team = load_team(&teams, &id).await?;

    let Some(manager_id) = team.manager_id else {
        return Ok(ApiResponse::success(Page::empty(pagination)));
    };

    let (employees, total) = teams.list_members(manager_id, pagination).await?;
    Ok(ApiResponse::success(Page::new(employees, total, pagination)))
}

pub async fn add_employee_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path(id): Path<String>,
    payload: Result<Json<AddEmployeeRequest>, JsonRejection>,
) -> ApiResult<TeamEmployee> {
    let email = AddEmployeeRequest::from_payload(payload)?;
    let teams = TeamService::new(pool.clone());
    let team = load_team(&teams, &id).await?;
    let manager_id = manager_of(&team)?;

    let employee = UserService::new(pool)
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if employee.id == manager_id {
        return Err(ApiError::bad_request("Cannot add the manager as an employee"));
    }

    let member = teams
        .add_member(manager_id, employee.id)
        .await?
        .ok_or_else(|| ApiError::bad_request("Employee already in this team"))?;

    tracing::info!("Added {} to team {} under manager {}", employee.id, team.id, manager_id);
    Ok(ApiResponse::created(member))
}

pub async fn remove_employee_delete(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path((id, employee_id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let teams = TeamService::new(pool);
    let team = load_team(&teams, &id).await?;
    let manager_id = manager_of(&team)?;
    let employee_id = parse_uuid(&employee_id)?;

    if !teams.remove_member(manager_id, employee_id).await? {
        return Err(ApiError::not_found("Employee not found in this team"));
    }

    tracing::info!("Removed {} from team {}", employee_id, team.id);
    Ok(ApiResponse::success(json!({
        "message": "Employee removed from team successfully",
        "team_id": team.id,
        "employee_id": employee_id,
    })))
}
