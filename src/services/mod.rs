pub mod dashboard_service;
pub mod team_service;
pub mod tenant_service;
pub mod user_service;
pub mod work_confirmation_service;

pub use dashboard_service::DashboardService;
pub use team_service::TeamService;
pub use tenant_service::{TenantError, TenantService};
pub use user_service::{NewUser, UserService};
pub use work_confirmation_service::{NewWorkConfirmation, StatusCounts, WorkConfirmationChanges, WorkConfirmationService};
