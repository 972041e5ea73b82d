// handlers/protected/teams/update_employee.rs - PUT /api/teams/my-employees/:employee_id

use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::TeamService;

/// Confirms the employee is on the caller's team. Managers have no editable employee fields yet,
/// so the request body is accepted and ignored.
pub async fn update_employee_put(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(employee_id): Path<String>,
) -> ApiResult<Value> {
    let employee_id = parse_uuid(&employee_id)?;

    if !TeamService::new(pool).is_member(user.id, employee_id).await? {
        return Err(ApiError::not_found("Employee not found in your team"));
    }

    Ok(ApiResponse::success(json!({
        "message": "Employee updated successfully",
        "employee_id": employee_id,
    })))
}
