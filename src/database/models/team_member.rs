use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::Role;

/// An employee as seen through a manager's team: the user joined with their membership row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamEmployee {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub team_member_id: Uuid,
}
