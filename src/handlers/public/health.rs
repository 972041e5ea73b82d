// handlers/public/health.rs - Service info and health checks

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Office API",
            "version": version,
            "description": "Multi-tenant office administration backend (work confirmations, teams, profiles)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health, /healthcheck (public)",
                "google_auth": "/auth/google/login, /auth/google/callback (public - token acquisition)",
                "work_confirmations": "/api/work-confirmations[/:id[/approve|/reject]] (protected)",
                "teams": "/api/teams/my-team, /api/teams/my-employees (protected, managers)",
                "departments": "/api/teams[/:id], /api/teams/users (protected, leaders)",
                "dashboard": "/api/dashboard/* (protected, leaders)",
                "profile": "/api/profile[/avatar] (protected)",
                "images": "/api/images/:bucket/*key (protected)",
            }
        }
    }))
}

/// GET /health - Readiness: 200 when the main database answers, 503 otherwise
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": true,
                    "message": "Database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// GET /healthcheck - Liveness only, never touches the database
pub async fn healthcheck() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "status": "ok" })))
}
