use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::ActivityService;
use crate::state::SharedState;

mod activity;
mod admin;
mod badges;
mod error;
mod leaderboard;
mod observability;
mod system;
mod types;
mod user;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn activity(&self) -> &Arc<dyn ActivityService> {
        &self.shared.activity
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.shared.clock.now()
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let admin_routes = Router::new()
        .route("/admin/reset", post(admin::reset_leaderboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin_key,
        ));

    let api_router = Router::new()
        .route("/user/login", post(user::login).get(user::login))
        .route("/user/stats", get(user::get_stats))
        .route("/users/{user_id}", get(user::get_user))
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .route("/activities", get(activity::get_activities))
        .route("/badges", get(badges::list_badges))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/system/status", get(system::get_status))
        .route("/metrics", get(observability::get_metrics))
        .merge(admin_routes)
        .route_layer(middleware::from_fn(observability::track_requests))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
