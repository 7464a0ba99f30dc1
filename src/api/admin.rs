//! Administrative endpoints, guarded by the configured admin API key.

use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::{ApiError, ApiResponse, AppState};
use crate::models::ResetSummary;

/// Rejects requests that don't carry the admin key.
///
/// Every request is rejected when no key is configured.
pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config().server.admin_api_key.as_deref() else {
        warn!("Admin endpoint called but no admin API key is configured");
        return Err(ApiError::unauthorized("Admin API is disabled"));
    };

    match extract_api_key(&headers) {
        Some(key) if key == expected => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("Invalid or missing API key")),
    }
}

/// Reads the key from `X-Api-Key` or `Authorization: Bearer`.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str);
    }

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}

/// Clears usage and active-day counters for every user right now.
///
/// # Endpoint
/// `POST /api/admin/reset`
pub async fn reset_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ResetSummary>>, ApiError> {
    let summary = state.activity().reset().await?;
    info!(users_reset = summary.users_reset, "Leaderboard reset by admin");
    Ok(Json(ApiResponse::success(summary)))
}
