// handlers/protected/departments/list.rs - GET /api/teams

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};

use super::{with_manager, TeamView};
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::{TeamService, UserService};
use crate::types::{Page, PageQuery};

/// All departments, newest first, each with its manager summary
pub async fn list_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Page<TeamView>> {
    let Query(query) = query?;
    let pagination = query.resolve();
    let (teams, total) = TeamService::new(pool.clone()).list_teams(pagination).await?;

    let users = UserService::new(pool);
    let mut views = Vec::with_capacity(teams.len());
    for team in teams {
        views.push(with_manager(&users, team).await?);
    }

    Ok(ApiResponse::success(Page::new(views, total, pagination)))
}
