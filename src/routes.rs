// routes.rs - Router assembly
//
// Middleware chain for /api (outermost first):
//   jwt_auth_middleware -> validate_tenant_middleware -> current_user_middleware -> role gate
//
// `route_layer` keeps unknown paths at 404 instead of 401. Layers added later wrap the earlier
// ones, so the chain is attached in reverse.

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{self, Environment};
use crate::handlers::{protected, public};
use crate::middleware::{
    current_user_middleware, jwt_auth_middleware, require_leader, require_manager, validate_tenant_middleware,
};

pub fn app() -> Router {
    let settings = config::config();

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/healthcheck", get(public::healthcheck))
        .merge(auth_public_routes())
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(settings.api.max_request_size_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use public::auth;

    Router::new()
        // Google sign-in, the only way to obtain a token
        .route("/auth/google/login", get(auth::google_login_get))
        .route("/auth/google/callback", get(auth::google_callback_get))
}

/// Everything under /api, behind the authentication chain
fn api_routes() -> Router {
    Router::new()
        .merge(work_confirmation_routes())
        .merge(manager_team_routes())
        .merge(department_routes())
        .merge(dashboard_routes())
        .merge(profile_routes())
        .route("/api/images/*path", get(protected::images::image_get))
        .route_layer(from_fn(current_user_middleware))
        .route_layer(from_fn(validate_tenant_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn work_confirmation_routes() -> Router {
    use protected::work_confirmations as wc;

    Router::new()
        .route("/api/work-confirmations", get(wc::list_get).post(wc::create_post))
        .route("/api/work-confirmations/:id", get(wc::get_by_id).put(wc::update_put))
        .route("/api/work-confirmations/:id/approve", post(wc::approve_post))
        .route("/api/work-confirmations/:id/reject", post(wc::reject_post))
}

/// Manager self-service. Static segments here win over the leader routes' `:id`.
fn manager_team_routes() -> Router {
    use protected::teams;

    Router::new()
        .route("/api/teams/my-team", get(teams::my_team_get))
        .route("/api/teams/my-employees", get(teams::my_employees_get))
        .route(
            "/api/teams/my-employees/:employee_id",
            get(teams::my_employee_get).put(teams::update_employee_put),
        )
        .route("/api/teams/add-employee", post(teams::add_employee_post))
        .route("/api/teams/remove-employee/:employee_id", delete(teams::remove_employee_delete))
        .route_layer(from_fn(require_manager))
}

fn department_routes() -> Router {
    use protected::departments;

    Router::new()
        .route("/api/teams", get(departments::list_get).post(departments::create_post))
        .route("/api/teams/users", get(departments::users_get))
        .route("/api/teams/users/:user_id/role", put(departments::update_role_put))
        .route(
            "/api/teams/:id",
            get(departments::get_by_id)
                .put(departments::update_put)
                .delete(departments::delete_team),
        )
        .route("/api/teams/:id/assign-manager", post(departments::assign_manager_post))
        .route("/api/teams/:id/employees", get(departments::employees_get))
        .route("/api/teams/:id/add-employee", post(departments::add_employee_post))
        .route(
            "/api/teams/:id/remove-employee/:employee_id",
            delete(departments::remove_employee_delete),
        )
        .route_layer(from_fn(require_leader))
}

fn dashboard_routes() -> Router {
    use protected::dashboard;

    Router::new()
        .route("/api/dashboard/stats", get(dashboard::stats_get))
        .route(
            "/api/dashboard/work-confirmations-stats",
            get(dashboard::work_confirmations_stats_get),
        )
        .route("/api/dashboard/teams-stats", get(dashboard::teams_stats_get))
        .route_layer(from_fn(require_leader))
}

fn profile_routes() -> Router {
    use protected::profile;

    Router::new()
        .route("/api/profile", get(profile::profile_get).put(profile::profile_put))
        .route("/api/profile/avatar", post(profile::avatar_post))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if matches!(config::config().environment, Environment::Development) || security.enable_cors {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
