//! Health and status endpoints.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::types::SystemStatus;
use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthLiveResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthReadyResponse {
    pub ready: bool,
    pub store: bool,
}

/// # Endpoint
/// `GET /api/health/live`
pub async fn health_live() -> Json<HealthLiveResponse> {
    Json(HealthLiveResponse { status: "alive" })
}

/// Ready once the store answers a stats query.
///
/// # Endpoint
/// `GET /api/health/ready`
pub async fn health_ready(State(state): State<Arc<AppState>>) -> Json<HealthReadyResponse> {
    let store = state.activity().stats().await.is_ok();
    Json(HealthReadyResponse {
        ready: store,
        store,
    })
}

/// # Endpoint
/// `GET /api/system/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let stats = state.activity().stats().await?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        total_users: stats.total_users,
        persistence: state.config().store.persist,
        next_reset: stats.next_reset,
    })))
}
