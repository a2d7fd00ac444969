pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::web::middleware::auth as auth_middleware;
use crate::web::routes::{activities, connections, discovery, health, preferences};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    // Everything under /api requires an identity
    let protected_routes = Router::new()
        .route("/api/discover", get(discovery::discover_users_handler))
        .route(
            "/api/activities",
            get(activities::discover_activities_handler),
        )
        .route(
            "/api/activities/:activity_id/join",
            post(activities::join_handler).delete(activities::leave_handler),
        )
        .route(
            "/api/activities/:activity_id/participants/:user_id",
            post(activities::participant_action_handler),
        )
        .route(
            "/api/connections",
            get(connections::list_handler).post(connections::request_handler),
        )
        .route(
            "/api/connections/:connection_id",
            patch(connections::respond_handler)
                .delete(connections::remove_handler),
        )
        .route("/api/users/:user_id/block", post(connections::block_handler))
        .route(
            "/api/me/preferences",
            get(preferences::get_preferences_handler)
                .put(preferences::update_preferences_handler),
        )
        .route(
            "/api/me/profile/completion",
            post(preferences::check_completion_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(protected_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
