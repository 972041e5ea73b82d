// handlers/protected/work_confirmations/mod.rs - /api/work-confirmations
//
// Employees submit work confirmations with photos, then managers and leaders approve or reject
// them. The status rules live in `crate::workflow`; these handlers load rows, run the rules and
// persist the outcome.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Role, User, WorkConfirmation};
use crate::error::ApiError;
use crate::services::{TeamService, WorkConfirmationService};
use crate::workflow::{self, ListScope};

pub mod approve;
pub mod create;
pub mod get;
pub mod list;
pub mod reject;
pub mod update;

pub use approve::approve_post;
pub use create::create_post;
pub use get::get_by_id;
pub use list::list_get;
pub use reject::reject_post;
pub use update::update_put;

pub(crate) const PHOTO_FOLDER: &str = "work-confirmations";

/// Which creators the caller may see, narrowed to `requested_creator` when given
pub(crate) async fn visibility(
    pool: &PgPool,
    user: &User,
    requested_creator: Option<Uuid>,
) -> Result<ListScope, ApiError> {
    let team_member_ids = match user.role {
        Role::Manager => TeamService::new(pool.clone()).member_ids(user.id).await?,
        _ => Vec::new(),
    };
    Ok(workflow::list_scope(user.role, user.id, &team_member_ids, requested_creator)?)
}

pub(crate) async fn find_or_404(service: &WorkConfirmationService, id: Uuid) -> Result<WorkConfirmation, ApiError> {
    service
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Work confirmation not found"))
}
