use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Team, TeamEmployee};
use crate::types::Pagination;

const TEAM_COLUMNS: &str = "id, name, description, manager_id, created_at, updated_at, deleted_at";

const TEAM_EMPLOYEE_SELECT: &str = "SELECT u.id, u.full_name, u.email, u.phone_number, u.avatar, u.role, \
     tm.joined_at, tm.id AS team_member_id \
     FROM team_members tm JOIN users u ON u.id = tm.employee_id \
     WHERE tm.manager_id = $1 AND tm.deleted_at IS NULL AND u.deleted_at IS NULL";

/// Table access for `teams` and `team_members` in one tenant database.
///
/// Membership is keyed by manager: a team's employees are the live membership rows
/// whose `manager_id` is the team's manager.
pub struct TeamService {
    pool: PgPool,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- teams ----

    pub async fn list_teams(&self, pagination: Pagination) -> Result<(Vec<Team>, i64), DatabaseError> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = self.count_teams().await?;
        Ok((teams, total))
    }

    pub async fn all_teams(&self) -> Result<Vec<Team>, DatabaseError> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    pub async fn count_teams(&self) -> Result<i64, DatabaseError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teams WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn find_team(&self, id: Uuid) -> Result<Option<Team>, DatabaseError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    /// Like [`find_team`](Self::find_team) but a missing team is an error
    pub async fn get_team(&self, id: Uuid) -> Result<Team, DatabaseError> {
        self.find_team(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Team not found".to_string()))
    }

    pub async fn create_team(
        &self,
        name: &str,
        description: &str,
        manager_id: Option<Uuid>,
    ) -> Result<Team, DatabaseError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (id, name, description, manager_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(team)
    }

    pub async fn update_team(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Team, DatabaseError> {
        sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Team not found".to_string()))
    }

    pub async fn assign_manager(&self, id: Uuid, manager_id: Uuid) -> Result<Team, DatabaseError> {
        sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams SET manager_id = $2, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(manager_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Team not found".to_string()))
    }

    /// Soft delete. Memberships stay with the manager.
    pub async fn delete_team(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE teams SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Team not found".to_string()));
        }
        Ok(())
    }

    // ---- membership ----

    pub async fn member_ids(&self, manager_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        // same membership set as count_members and list_members
        let ids = sqlx::query_scalar::<_, Uuid>(&format!("SELECT id FROM ({TEAM_EMPLOYEE_SELECT}) members"))
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn is_member(&self, manager_id: Uuid, employee_id: Uuid) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                 SELECT 1 FROM team_members tm JOIN users u ON u.id = tm.employee_id
                 WHERE tm.manager_id = $1 AND tm.employee_id = $2
                   AND tm.deleted_at IS NULL AND u.deleted_at IS NULL
             )",
        )
        .bind(manager_id)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn count_members(&self, manager_id: Uuid) -> Result<i64, DatabaseError> {
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM ({TEAM_EMPLOYEE_SELECT}) members"
        ))
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Employees under a manager, most recently joined first
    pub async fn list_members(
        &self,
        manager_id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<TeamEmployee>, i64), DatabaseError> {
        let members = sqlx::query_as::<_, TeamEmployee>(&format!(
            "{TEAM_EMPLOYEE_SELECT} ORDER BY tm.joined_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(manager_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = self.count_members(manager_id).await?;
        Ok((members, total))
    }

    pub async fn all_members(&self, manager_id: Uuid) -> Result<Vec<TeamEmployee>, DatabaseError> {
        let members = sqlx::query_as::<_, TeamEmployee>(&format!("{TEAM_EMPLOYEE_SELECT} ORDER BY tm.joined_at DESC"))
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    pub async fn find_member(&self, manager_id: Uuid, employee_id: Uuid) -> Result<Option<TeamEmployee>, DatabaseError> {
        let member = sqlx::query_as::<_, TeamEmployee>(&format!("{TEAM_EMPLOYEE_SELECT} AND tm.employee_id = $2"))
            .bind(manager_id)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(member)
    }

    /// Insert a live membership. `None` when the pair is already live.
    pub async fn add_member(&self, manager_id: Uuid, employee_id: Uuid) -> Result<Option<TeamEmployee>, DatabaseError> {
        let member = sqlx::query_as::<_, TeamEmployee>(
            "WITH inserted AS (
                 INSERT INTO team_members (id, manager_id, employee_id, joined_at)
                 VALUES ($1, $2, $3, now())
                 ON CONFLICT (manager_id, employee_id) WHERE deleted_at IS NULL DO NOTHING
                 RETURNING id, employee_id, joined_at
             )
             SELECT u.id, u.full_name, u.email, u.phone_number, u.avatar, u.role,
                    i.joined_at, i.id AS team_member_id
             FROM inserted i JOIN users u ON u.id = i.employee_id",
        )
        .bind(Uuid::new_v4())
        .bind(manager_id)
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    /// Soft-delete a live membership. `false` when there was none.
    pub async fn remove_member(&self, manager_id: Uuid, employee_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE team_members SET deleted_at = now(), updated_at = now()
             WHERE manager_id = $1 AND employee_id = $2 AND deleted_at IS NULL",
        )
        .bind(manager_id)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
