use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ModelError;

/// Work-confirmation system role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Leader,
    AssistantDirector,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Employee, Role::Manager, Role::Leader, Role::AssistantDirector];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Leader => "leader",
            Role::AssistantDirector => "assistant_director",
        }
    }

    /// Leadership sees every work confirmation in the tenant.
    pub fn sees_everyone(&self) -> bool {
        matches!(self, Role::Leader | Role::AssistantDirector)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    /// An empty role is an employee, which is what accounts created before roles existed carry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "leader" => Ok(Role::Leader),
            "assistant_director" => Ok(Role::AssistantDirector),
            other => Err(ModelError { kind: "role", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_verify_phone: bool,
    pub is_verify_email: bool,
    pub oauth_provider: Option<String>,
    pub oauth_provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Public profile shape returned by `/api/profile`
    pub fn profile(&self) -> Profile {
        Profile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
            is_verify_phone: self.is_verify_phone,
            is_verify_email: self.is_verify_email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub avatar: String,
    pub role: Role,
    pub is_verify_phone: bool,
    pub is_verify_email: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
