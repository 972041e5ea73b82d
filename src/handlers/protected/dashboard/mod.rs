// handlers/protected/dashboard/mod.rs - Leader dashboards under /api/dashboard

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use serde::Deserialize;

use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, TenantPool};
use crate::services::dashboard_service::{Overview, TeamsStats, WorkConfirmationStats};
use crate::services::{DashboardService, TeamService};

/// GET /api/dashboard/stats - Tenant-wide totals for teams, users and work confirmations
pub async fn stats_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<Overview> {
    let overview = DashboardService::new(pool).overview().await?;
    Ok(ApiResponse::success(overview))
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkConfirmationStatsQuery {
    pub team_id: Option<String>,
}

/// GET /api/dashboard/work-confirmations-stats[?team_id=] - Counts by status
///
/// With `team_id` the counts cover the team's manager and members only. A team without a
/// manager reports zeros.
pub async fn work_confirmations_stats_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<WorkConfirmationStatsQuery>, QueryRejection>,
) -> ApiResult<WorkConfirmationStats> {
    let Query(query) = query?;
    let team = match query.team_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(TeamService::new(pool.clone()).get_team(parse_uuid(raw)?).await?),
        None => None,
    };

    let stats = DashboardService::new(pool).work_confirmation_stats(team.as_ref()).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/dashboard/teams-stats - Headcount and form volume per team
pub async fn teams_stats_get(Extension(TenantPool(pool)): Extension<TenantPool>) -> ApiResult<TeamsStats> {
    let stats = DashboardService::new(pool).teams_stats().await?;
    Ok(ApiResponse::success(stats))
}
