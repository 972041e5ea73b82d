// handlers/public/auth/mod.rs - Google sign-in

pub mod google_callback;
pub mod google_login;

pub use google_callback::google_callback_get;
pub use google_login::google_login_get;
