// handlers/protected/work_confirmations/approve.rs - POST /api/work-confirmations/:id/approve

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use chrono::Utc;
use serde::Deserialize;

use super::find_or_404;
use crate::database::models::{Approval, WorkConfirmation};
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::{TeamService, WorkConfirmationService};
use crate::workflow::{self, Decision, WorkflowError};

#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    #[serde(default)]
    pub comment: String,
}

/**
 * POST /api/work-confirmations/:id/approve - Approve the current stage
 *
 * `pending_manager` needs a manager and moves to `pending_leader`; when the form came from an
 * employee the manager must have that employee on their team. `pending_leader` needs a leader
 * and moves to `approved`.
 *
 * The body `{ "comment": "..." }` is optional. A missing or unparsable body means no comment.
 */
pub async fn approve_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<WorkConfirmation> {
    let id = parse_uuid(&id)?;
    let request: ApproveRequest = serde_json::from_slice(&body).unwrap_or_default();

    let service = WorkConfirmationService::new(pool.clone());
    let record = find_or_404(&service, id).await?;

    let transition = workflow::plan_transition(record.status, record.creator_role, user.role, Decision::Approve)
        .map_err(|e| {
            tracing::warn!("User {} ({}) cannot approve {}: {}", user.id, user.role, id, e);
            e
        })?;

    if transition.team_check_required
        && !TeamService::new(pool).is_member(user.id, record.created_by).await?
    {
        tracing::warn!("Manager {} tried to approve {} from outside their team", user.id, id);
        return Err(WorkflowError::NotTeamMember(Decision::Approve).into());
    }

    let approval = Approval {
        approved_by: user.id,
        approved_at: Utc::now(),
        comment: request.comment.trim().to_string(),
    };

    let updated = service
        .approve(id, transition.stage, transition.from, transition.to, approval)
        .await?
        .ok_or(WorkflowError::StaleStatus)?;

    tracing::info!("Work confirmation {} approved by {}: {} -> {}", id, user.id, transition.from, transition.to);
    Ok(ApiResponse::success(updated))
}
