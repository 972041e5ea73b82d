// handlers/protected/mod.rs - Handlers behind the /api authentication chain
//
// Every request here has passed `jwt_auth_middleware`, `validate_tenant_middleware` and
// `current_user_middleware`, so handlers can rely on `TenantPool`, `ValidatedTenant` and
// `CurrentUser` extensions being present. Role gates are applied per route group in `routes.rs`.

pub mod dashboard;
pub mod departments;
pub mod images;
pub mod profile;
pub mod teams;
pub mod work_confirmations;
