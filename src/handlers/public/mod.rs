// handlers/public/mod.rs - Handlers reachable without a token
//
// Token acquisition goes through Google: `/auth/google/login` hands out the consent URL and
// `/auth/google/callback` turns the authorization code into our own JWT.

pub mod auth;
pub mod health;

pub use health::{health, healthcheck, root};
