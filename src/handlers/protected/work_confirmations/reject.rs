// handlers/protected/work_confirmations/reject.rs - POST /api/work-confirmations/:id/reject

use axum::extract::{rejection::JsonRejection, Extension, Path};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use super::find_or_404;
use crate::database::models::{Rejection, WorkConfirmation};
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::{TeamService, WorkConfirmationService};
use crate::workflow::{self, Decision, WorkflowError};

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

/// POST /api/work-confirmations/:id/reject - Reject at either pending stage with `{ "reason" }`
pub async fn reject_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> ApiResult<WorkConfirmation> {
    let id = parse_uuid(&id)?;
    let Json(request) = payload?;

    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::invalid_field("reason", "Reason is required"));
    }

    let service = WorkConfirmationService::new(pool.clone());
    let record = find_or_404(&service, id).await?;

    let transition = workflow::plan_transition(record.status, record.creator_role, user.role, Decision::Reject)?;

    if transition.team_check_required
        && !TeamService::new(pool).is_member(user.id, record.created_by).await?
    {
        return Err(WorkflowError::NotTeamMember(Decision::Reject).into());
    }

    let rejection = Rejection {
        rejected_by: user.id,
        rejected_at: Utc::now(),
        reason: reason.to_string(),
    };

    let updated = service
        .reject(id, transition.from, rejection)
        .await?
        .ok_or(WorkflowError::StaleStatus)?;

    tracing::info!("Work confirmation {} rejected by {} at {}", id, user.id, transition.from);
    Ok(ApiResponse::success(updated))
}
