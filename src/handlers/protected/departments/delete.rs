// handlers/protected/departments/delete.rs - DELETE /api/teams/:id

use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use super::load_team;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::TeamService;

pub async fn delete_team(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let teams = TeamService::new(pool);
    let team = load_team(&teams, &id).await?;
    teams.delete_team(team.id).await?;

    tracing::info!("Team {} ({}) deleted by {}", team.id, team.name, user.id);
    Ok(ApiResponse::success(json!({
        "message": "Team deleted successfully",
        "id": team.id,
    })))
}
