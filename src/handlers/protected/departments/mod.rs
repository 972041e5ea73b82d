// handlers/protected/departments/mod.rs - Department administration under /api/teams
//
// Leader-only. Departments are `teams` rows; a department's employees are whoever is on its
// manager's team, so most employee operations resolve the manager first.

use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Role, Team, TeamEmployee, User, UserSummary};
use crate::error::ApiError;
use crate::services::{TeamService, UserService};

pub mod assign_manager;
pub mod create;
pub mod delete;
pub mod employees;
pub mod get;
pub mod list;
pub mod update;
pub mod users;

pub use assign_manager::assign_manager_post;
pub use create::create_post;
pub use delete::delete_team;
pub use employees::{add_employee_post, employees_get, remove_employee_delete};
pub use get::get_by_id;
pub use list::list_get;
pub use update::update_put;
pub use users::{update_role_put, users_get};

/// A team with its manager expanded
#[derive(Debug, Serialize)]
pub struct TeamView {
    #[serde(flatten)]
    pub team: Team,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: TeamView,
    pub employees: Vec<TeamEmployee>,
    pub total_employees: usize,
}

pub(crate) async fn with_manager(users: &UserService, team: Team) -> Result<TeamView, ApiError> {
    let manager = match team.manager_id {
        Some(manager_id) => users.find_by_id(manager_id).await?.map(|m| m.summary()),
        None => None,
    };
    Ok(TeamView { team, manager })
}

/// The user named as a team's manager must exist and hold the manager role
pub(crate) async fn load_manager(users: &UserService, manager_id: Uuid) -> Result<User, ApiError> {
    let manager = users
        .find_by_id(manager_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Manager not found"))?;

    if manager.role != Role::Manager {
        return Err(ApiError::invalid_field("manager_id", "User is not a manager"));
    }
    Ok(manager)
}

pub(crate) async fn load_team(teams: &TeamService, id: &str) -> Result<Team, ApiError> {
    let id = crate::handlers::utils::parse_uuid(id)?;
    Ok(teams.get_team(id).await?)
}
