use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::Role;
use super::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkConfirmationStatus {
    PendingManager,
    PendingLeader,
    Approved,
    Rejected,
}

impl WorkConfirmationStatus {
    pub const ALL: [WorkConfirmationStatus; 4] = [
        WorkConfirmationStatus::PendingManager,
        WorkConfirmationStatus::PendingLeader,
        WorkConfirmationStatus::Approved,
        WorkConfirmationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkConfirmationStatus::PendingManager => "pending_manager",
            WorkConfirmationStatus::PendingLeader => "pending_leader",
            WorkConfirmationStatus::Approved => "approved",
            WorkConfirmationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkConfirmationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkConfirmationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError { kind: "status", value: s.to_string() })
    }
}

impl TryFrom<String> for WorkConfirmationStatus {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub url: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    pub approved_by: Uuid,
    pub approved_at: DateTime<Utc>,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub rejected_by: Uuid,
    pub rejected_at: DateTime<Utc>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkConfirmation {
    pub id: Uuid,
    pub created_by: Uuid,
    #[sqlx(try_from = "String")]
    pub creator_role: Role,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub content: String,
    pub photos: Json<Vec<Photo>>,
    #[sqlx(try_from = "String")]
    pub status: WorkConfirmationStatus,
    pub manager_approval: Option<Json<Approval>>,
    pub leader_approval: Option<Json<Approval>>,
    pub rejection: Option<Json<Rejection>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_status() {
        for status in WorkConfirmationStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkConfirmationStatus>().unwrap(), status);
        }
        assert!("pending".parse::<WorkConfirmationStatus>().is_err());
    }

    #[test]
    fn approval_comment_defaults_to_empty() {
        let approval: Approval = serde_json::from_value(serde_json::json!({
            "approved_by": Uuid::nil(),
            "approved_at": "2024-05-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(approval.comment, "");
    }
}
