use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Role, User};
use crate::types::Pagination;

pub const USER_COLUMNS: &str = "id, full_name, email, phone_number, avatar, role, is_verify_phone, is_verify_email, \
     oauth_provider, oauth_provider_id, created_at, updated_at, deleted_at";

/// Fields for a new account. Everything not listed takes the column default.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: String,
    pub role: Role,
    pub is_verify_email: bool,
    pub oauth_provider: Option<String>,
    pub oauth_provider_id: Option<String>,
}

/// Table access for `users` in one tenant database
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Live user by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// User by id, soft-deleted rows included
    pub async fn find_by_id_any(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Live user by email, case-insensitive
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1) AND deleted_at IS NULL"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Best match for an email: the live account if any, else the most recently deleted one
    pub async fn find_by_email_any(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)
             ORDER BY (deleted_at IS NULL) DESC, deleted_at DESC
             LIMIT 1"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, full_name, email, phone_number, avatar, role, is_verify_email,
                                oauth_provider, oauth_provider_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.full_name)
        .bind(new_user.email.trim())
        .bind(&new_user.phone_number)
        .bind(&new_user.avatar)
        .bind(new_user.role.as_str())
        .bind(new_user.is_verify_email)
        .bind(&new_user.oauth_provider)
        .bind(&new_user.oauth_provider_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(DatabaseError::Conflict(
                format!("User with email '{}' already exists", new_user.email),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the provided profile fields; `None` leaves a column untouched
    pub async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET full_name = COALESCE($2, full_name),
                 phone_number = COALESCE($3, phone_number),
                 updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(full_name)
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn update_avatar(&self, id: Uuid, avatar_url: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET avatar = $2, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// Sign-in from an OAuth provider marks the email verified and links the provider id
    pub async fn link_oauth(&self, id: Uuid, provider: &str, provider_id: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET oauth_provider = $2, oauth_provider_id = $3, is_verify_email = true, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// Live users, newest first, optionally restricted to one role
    pub async fn list(&self, role: Option<Role>, pagination: Pagination) -> Result<(Vec<User>, i64), DatabaseError> {
        let role = role.map(|r| r.as_str());

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR role = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(role)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = self.count(role).await?;
        Ok((users, total))
    }

    async fn count(&self, role: Option<&str>) -> Result<i64, DatabaseError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL AND ($1::text IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn count_by_role(&self, role: Role) -> Result<i64, DatabaseError> {
        self.count(Some(role.as_str())).await
    }
}
