// handlers/protected/departments/get.rs - GET /api/teams/:id

use axum::extract::{Extension, Path};

use super::{load_team, with_manager, TeamDetail};
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{TeamService, UserService};

pub async fn get_by_id(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path(id): Path<String>,
) -> ApiResult<TeamDetail> {
    let teams = TeamService::new(pool.clone());
    let team = load_team(&teams, &id).await?;

    let employees = match team.manager_id {
        Some(manager_id) => teams.all_members(manager_id).await?,
        None => Vec::new(),
    };

    let team = with_manager(&UserService::new(pool), team).await?;
    Ok(ApiResponse::success(TeamDetail {
        team,
        total_employees: employees.len(),
        employees,
    }))
}
