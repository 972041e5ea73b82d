// handlers/protected/departments/update.rs - PUT /api/teams/:id

use axum::extract::{rejection::JsonRejection, Extension, Path};
use axum::Json;
use serde::Deserialize;

use super::{load_team, with_manager, TeamView};
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{TeamService, UserService};

#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Blank fields are left untouched
pub async fn update_put(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTeamRequest>, JsonRejection>,
) -> ApiResult<TeamView> {
    let Json(request) = payload?;
    let teams = TeamService::new(pool.clone());
    let team = load_team(&teams, &id).await?;

    let name = request.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let description = request.description.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let updated = teams.update_team(team.id, name, description).await?;
    Ok(ApiResponse::success(with_manager(&UserService::new(pool), updated).await?))
}
