// handlers/protected/departments/create.rs - POST /api/teams

use axum::extract::{rejection::JsonRejection, Extension};
use axum::Json;
use serde::Deserialize;

use super::{load_manager, with_manager, TeamView};
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::{TeamService, UserService};

#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub manager_id: Option<String>,
}

/**
 * POST /api/teams - Create a department
 *
 * Input:
 * ```json
 * { "name": "Engineering", "description": "optional", "manager_id": "optional uuid" }
 * ```
 *
 * A manager, when given, must be an existing user with the manager role.
 */
pub async fn create_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> ApiResult<TeamView> {
    let Json(request) = payload?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::invalid_field("name", "name is required"));
    }

    let users = UserService::new(pool.clone());
    let manager_id = match request.manager_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(load_manager(&users, parse_uuid(raw)?).await?.id),
        None => None,
    };

    let team = TeamService::new(pool)
        .create_team(name, request.description.trim(), manager_id)
        .await?;

    tracing::info!("Team {} ({}) created by {}", team.id, team.name, user.id);
    Ok(ApiResponse::created(with_manager(&users, team).await?))
}
