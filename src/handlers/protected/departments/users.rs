// handlers/protected/departments/users.rs - GET /api/teams/users, PUT /api/teams/users/:user_id/role

use axum::extract::rejection::QueryRejection;
use axum::extract::{rejection::JsonRejection, Extension, Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Role, User};
use crate::error::ApiError;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool};
use crate::services::UserService;
use crate::types::{Page, PageQuery};

/// Page size when the caller does not ask for one; the UI loads users into pickers.
const USERS_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub role: Role,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
        }
    }
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::invalid_field("role", "Invalid role"));
    }
    raw.parse().map_err(|_| ApiError::invalid_field("role", "Invalid role"))
}

pub async fn users_get(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    query: Result<Query<UsersQuery>, QueryRejection>,
) -> ApiResult<Page<UserListItem>> {
    let Query(query) = query?;
    let pagination = PageQuery { page: query.page, limit: query.limit }.resolve_with_default(USERS_PAGE_LIMIT);

    let role = match query.role.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse_role(raw)?),
        None => None,
    };

    let (users, total) = UserService::new(pool).list(role, pagination).await?;
    let items = users.into_iter().map(UserListItem::from).collect();
    Ok(ApiResponse::success(Page::new(items, total, pagination)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

/// Leaders promote and demote anyone but themselves
pub async fn update_role_put(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> ApiResult<UserListItem> {
    let user_id = parse_uuid(&user_id)?;
    let Json(request) = payload?;
    let role = parse_role(&request.role)?;

    let users = UserService::new(pool);
    let target = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if target.id == user.id {
        return Err(ApiError::bad_request("Cannot change your own role"));
    }

    let updated = users.update_role(target.id, role).await?;
    tracing::info!("User {} role changed {} -> {} by {}", updated.id, target.role, updated.role, user.id);
    Ok(ApiResponse::success(updated.into()))
}
