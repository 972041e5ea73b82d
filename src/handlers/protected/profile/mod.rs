// handlers/protected/profile/mod.rs - The caller's own account under /api/profile

pub mod avatar;
pub mod get;
pub mod update;

pub use avatar::avatar_post;
pub use get::profile_get;
pub use update::profile_put;
