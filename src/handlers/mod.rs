// handlers/mod.rs - Two security tiers
//
// Public (no auth) -> Protected (JWT + tenant + user, with per-group role gates)

pub mod protected; // /api/*, see routes.rs for the middleware chain
pub mod public; // /, /health, /healthcheck, /auth/google/*
pub mod utils;
