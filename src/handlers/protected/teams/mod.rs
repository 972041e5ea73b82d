// handlers/protected/teams/mod.rs - Manager self-service under /api/teams
//
// Every route here sits behind `require_manager`. A manager's team is the set of live
// `team_members` rows that point at them.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;

pub mod add_employee;
pub mod my_employees;
pub mod my_team;
pub mod remove_employee;
pub mod update_employee;

pub use add_employee::add_employee_post;
pub use my_employees::{my_employee_get, my_employees_get};
pub use my_team::my_team_get;
pub use remove_employee::remove_employee_delete;
pub use update_employee::update_employee_put;

/// `{ "email": "..." }` body shared by the two add-employee routes
#[derive(Debug, Deserialize)]
pub struct AddEmployeeRequest {
    #[serde(default)]
    pub email: String,
}

impl AddEmployeeRequest {
    pub fn from_payload(payload: Result<Json<AddEmployeeRequest>, JsonRejection>) -> Result<String, ApiError> {
        let Json(request) = payload?;
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(ApiError::invalid_field("email", "email is required"));
        }
        Ok(email)
    }
}
