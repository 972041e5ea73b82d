pub mod auth;
pub mod current_user;
pub mod require_role;
pub mod response;
pub mod validate_tenant;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use current_user::{current_user_middleware, CurrentUser};
pub use require_role::{require_leader, require_manager};
pub use response::{ApiResponse, ApiResult};
pub use validate_tenant::{validate_tenant_middleware, TenantPool, ValidatedTenant};
