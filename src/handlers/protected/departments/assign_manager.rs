// handlers/protected/departments/assign_manager.rs - POST /api/teams/:id/assign-manager

use axum::extract::{rejection::JsonRejection, Extension, Path};
use axum::Json;
use serde::Deserialize;

use super::{load_manager, load_team, TeamView};
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{TeamService, UserService};

#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    #[serde(default)]
    pub manager_id: String,
}

/// Replace the department's manager. Existing memberships stay with the previous manager.
pub async fn assign_manager_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path(id): Path<String>,
    payload: Result<Json<AssignManagerRequest>, JsonRejection>,
) -> ApiResult<TeamView> {
    let Json(request) = payload?;
    if request.manager_id.trim().is_empty() {
        return Err(ApiError::invalid_field("manager_id", "manager_id is required"));
    }

    let teams = TeamService::new(pool.clone());
    let team = load_team(&teams, &id).await?;

    let manager = load_manager(&UserService::new(pool), parse_uuid(&request.manager_id)?).await?;
    let updated = teams.assign_manager(team.id, manager.id).await?;

    tracing::info!("Team {} manager set to {}", updated.id, manager.id);
    Ok(ApiResponse::success(TeamView {
        team: updated,
        manager: Some(manager.summary()),
    }))
}
