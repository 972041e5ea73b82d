pub mod team;
pub mod team_member;
pub mod tenant;
pub mod user;
pub mod work_confirmation;

use thiserror::Error;

/// Raised when a TEXT column holds a value outside its enum
#[derive(Debug, Error)]
#[error("invalid {kind} value: {value}")]
pub struct ModelError {
    pub kind: &'static str,
    pub value: String,
}

pub use team::Team;
pub use team_member::TeamEmployee;
pub use tenant::Tenant;
pub use user::{Role, User, UserSummary};
pub use work_confirmation::{Approval, Photo, Rejection, WorkConfirmation, WorkConfirmationStatus};
