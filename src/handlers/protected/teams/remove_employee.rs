// handlers/protected/teams/remove_employee.rs - DELETE /api/teams/remove-employee/:employee_id

use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::TeamService;

pub async fn remove_employee_delete(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(employee_id): Path<String>,
) -> ApiResult<Value> {
    let employee_id = parse_uuid(&employee_id)?;

    if !TeamService::new(pool).remove_member(user.id, employee_id).await? {
        return Err(ApiError::not_found("Employee not found in your team"));
    }

    tracing::info!("Manager {} removed {} from their team", user.id, employee_id);
    Ok(ApiResponse::success(json!({
        "message": "Employee removed from team successfully",
        "employee_id": employee_id,
    })))
}
