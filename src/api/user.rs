//! User activity endpoints.
//!
//! `POST /api/user/login` is what the Termux-side scripts call after each
//! tool run; the identifier is the device's `whoami` output, sent either in
//! a JSON body or as a query parameter.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::types::{LoginResponse, LoginStatsDto, LoginUserDto, StatsResponse};
use super::validation::validate_user_id;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::API_VERSION;
use crate::models::UserRecord;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    pub user_id: Option<String>,
}

/// Picks the identifier from the JSON body, falling back to the query string.
///
/// An empty or missing body value defers to the query. A body value that is
/// present but not a string is rejected.
fn extract_user_id(body: &Bytes, query: LoginQuery) -> Result<Option<String>, ApiError> {
    if !body.is_empty() {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}")))?;

        match value.get("userId") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return Ok(Some(s.clone())),
            Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => {}
            Some(_) => {
                return Err(ApiError::validation(
                    "Invalid user ID: must be a string (max 50 chars)",
                ));
            }
        }
    }

    Ok(query.user_id.filter(|s| !s.is_empty()))
}

/// Records one activity for a user and reports their new standing.
///
/// # Endpoint
/// `POST /api/user/login` (also `GET` with `?userId=`)
///
/// # Errors
/// Returns [`ApiError::ValidationError`] for a missing, non-string or
/// over-length identifier.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let raw = extract_user_id(&body, query)?;
    let user_id = validate_user_id(raw.as_deref())?;

    let outcome = state.activity().record_activity(user_id).await?;
    let user = outcome.user;

    info!(
        user_id = %user.user_id,
        rank = outcome.rank,
        total_usage = user.total_usage,
        "User activity recorded"
    );

    Ok(Json(LoginResponse {
        success: true,
        message: "User activity recorded successfully",
        stats: LoginStatsDto {
            total_users: outcome.total_users,
            user_rank: outcome.rank,
            leaderboard_position: format!("{}/{}", outcome.rank, outcome.total_users),
        },
        data: LoginUserDto {
            user_id: user.user_id.into_inner(),
            rank: outcome.rank,
            total_usage: user.total_usage,
            active_days: user.active_days,
            badges: user.badges,
            last_active: user.last_active,
            join_date: user.join_date,
        },
        server_time: state.now(),
        api_version: API_VERSION,
    }))
}

/// Aggregate counters for the dashboard header.
///
/// # Endpoint
/// `GET /api/user/stats`
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.activity().stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
        server_time: state.now(),
        status: "operational",
    }))
}

/// # Endpoint
/// `GET /api/users/{user_id}`
///
/// The path segment is sanitized the same way as on login, so a raw
/// `whoami` value finds its record.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserRecord>>, ApiError> {
    let user_id = validate_user_id(Some(&user_id))?;
    let user = state.activity().user(&user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}
