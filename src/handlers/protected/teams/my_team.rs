// handlers/protected/teams/my_team.rs - GET /api/teams/my-team

use axum::extract::Extension;
use serde::Serialize;

use crate::database::models::{TeamEmployee, UserSummary};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::TeamService;

#[derive(Debug, Serialize)]
pub struct MyTeam {
    pub manager: UserSummary,
    pub employees: Vec<TeamEmployee>,
    pub total_employees: usize,
}

/// The calling manager plus every employee on their team
pub async fn my_team_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<MyTeam> {
    let employees = TeamService::new(pool).all_members(user.id).await?;

    Ok(ApiResponse::success(MyTeam {
        manager: user.summary(),
        total_employees: employees.len(),
        employees,
    }))
}
