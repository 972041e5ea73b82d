use chrono::NaiveDate;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Approval, Photo, Rejection, Role, WorkConfirmation, WorkConfirmationStatus};
use crate::types::Pagination;
use crate::workflow::Stage;

const WORK_CONFIRMATION_COLUMNS: &str = "id, created_by, creator_role, date, start_time, end_time, content, photos, \
     status, manager_approval, leader_approval, rejection, created_at, updated_at, deleted_at";

// $1 = creator ids (NULL for everyone), $2 = status (NULL for any)
const LIST_FILTER: &str = "deleted_at IS NULL
     AND ($1::uuid[] IS NULL OR created_by = ANY($1))
     AND ($2::text IS NULL OR status = $2)";

pub struct NewWorkConfirmation {
    pub created_by: Uuid,
    pub creator_role: Role,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub content: String,
    pub photos: Vec<Photo>,
    pub status: WorkConfirmationStatus,
}

/// Partial update. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct WorkConfirmationChanges {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub content: Option<String>,
    pub photos: Option<Vec<Photo>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending_manager: i64,
    pub pending_leader: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.pending_manager + self.pending_leader + self.approved + self.rejected
    }

    fn add(&mut self, status: WorkConfirmationStatus, count: i64) {
        match status {
            WorkConfirmationStatus::PendingManager => self.pending_manager += count,
            WorkConfirmationStatus::PendingLeader => self.pending_leader += count,
            WorkConfirmationStatus::Approved => self.approved += count,
            WorkConfirmationStatus::Rejected => self.rejected += count,
        }
    }
}

/// Table access for `work_confirmations` in one tenant database.
///
/// Status changes are compare-and-set: the `UPDATE` only matches while the row still carries the
/// status the caller read, and `None` comes back when another request got there first.
pub struct WorkConfirmationService {
    pool: PgPool,
}

impl WorkConfirmationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewWorkConfirmation) -> Result<WorkConfirmation, DatabaseError> {
        let record = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "INSERT INTO work_confirmations
                 (id, created_by, creator_role, date, start_time, end_time, content, photos, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {WORK_CONFIRMATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.created_by)
        .bind(new.creator_role.as_str())
        .bind(new.date)
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(&new.content)
        .bind(Json(&new.photos))
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<WorkConfirmation>, DatabaseError> {
        let record = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "SELECT {WORK_CONFIRMATION_COLUMNS} FROM work_confirmations WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Newest first. `creators = None` lists every creator.
    pub async fn list(
        &self,
        creators: Option<&[Uuid]>,
        status: Option<WorkConfirmationStatus>,
        pagination: Pagination,
    ) -> Result<(Vec<WorkConfirmation>, i64), DatabaseError> {
        let creators = creators.map(|ids| ids.to_vec());
        let status = status.map(|s| s.as_str());

        let records = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "SELECT {WORK_CONFIRMATION_COLUMNS} FROM work_confirmations
             WHERE {LIST_FILTER}
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(&creators)
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM work_confirmations WHERE {LIST_FILTER}"
        ))
        .bind(&creators)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((records, total))
    }

    /// Apply field changes while the form is still pending
    pub async fn update(
        &self,
        id: Uuid,
        changes: WorkConfirmationChanges,
    ) -> Result<Option<WorkConfirmation>, DatabaseError> {
        let record = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "UPDATE work_confirmations
             SET date = COALESCE($2, date),
                 start_time = COALESCE($3, start_time),
                 end_time = COALESCE($4, end_time),
                 content = COALESCE($5, content),
                 photos = COALESCE($6, photos),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
               AND status IN ('pending_manager', 'pending_leader')
             RETURNING {WORK_CONFIRMATION_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.date)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.content)
        .bind(changes.photos.map(Json))
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Record an approval for `stage` and move `from -> to`
    pub async fn approve(
        &self,
        id: Uuid,
        stage: Stage,
        from: WorkConfirmationStatus,
        to: WorkConfirmationStatus,
        approval: Approval,
    ) -> Result<Option<WorkConfirmation>, DatabaseError> {
        let column = match stage {
            Stage::ManagerReview => "manager_approval",
            Stage::LeaderReview => "leader_approval",
        };

        let record = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "UPDATE work_confirmations
             SET status = $3, {column} = $4, updated_at = now()
             WHERE id = $1 AND status = $2 AND deleted_at IS NULL
             RETURNING {WORK_CONFIRMATION_COLUMNS}"
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Json(approval))
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn reject(
        &self,
        id: Uuid,
        from: WorkConfirmationStatus,
        rejection: Rejection,
    ) -> Result<Option<WorkConfirmation>, DatabaseError> {
        let record = sqlx::query_as::<_, WorkConfirmation>(&format!(
            "UPDATE work_confirmations
             SET status = $3, rejection = $4, updated_at = now()
             WHERE id = $1 AND status = $2 AND deleted_at IS NULL
             RETURNING {WORK_CONFIRMATION_COLUMNS}"
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(WorkConfirmationStatus::Rejected.as_str())
        .bind(Json(rejection))
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Live forms per status. `creators = None` counts the whole tenant.
    pub async fn count_by_status(&self, creators: Option<&[Uuid]>) -> Result<StatusCounts, DatabaseError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM work_confirmations
             WHERE deleted_at IS NULL AND ($1::uuid[] IS NULL OR created_by = ANY($1))
             GROUP BY status",
        )
        .bind(creators.map(|ids| ids.to_vec()))
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            match status.parse::<WorkConfirmationStatus>() {
                Ok(status) => counts.add(status, count),
                Err(e) => tracing::warn!("Ignoring work confirmations with {}", e),
            }
        }
        Ok(counts)
    }

    pub async fn count_for_creators(&self, creators: &[Uuid]) -> Result<i64, DatabaseError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM work_confirmations WHERE deleted_at IS NULL AND created_by = ANY($1)",
        )
        .bind(creators)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
