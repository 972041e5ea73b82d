use axum::{extract::Request, middleware::Next, response::Response};

use super::current_user::CurrentUser;
use crate::database::models::Role;
use crate::error::ApiError;

fn caller_role(request: &Request) -> Result<Role, ApiError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .map(|CurrentUser(user)| user.role)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
}

/// Gate for the manager self-service team routes
pub async fn require_manager(request: Request, next: Next) -> Result<Response, ApiError> {
    if caller_role(&request)? != Role::Manager {
        return Err(ApiError::forbidden("Only managers can access this resource"));
    }
    Ok(next.run(request).await)
}

/// Gate for department administration and dashboards
pub async fn require_leader(request: Request, next: Next) -> Result<Response, ApiError> {
    if caller_role(&request)? != Role::Leader {
        return Err(ApiError::forbidden("Only leaders can access this resource"));
    }
    Ok(next.run(request).await)
}
