use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::LeaderboardResponse;
use super::validation::parse_limit;
use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<String>,
}

/// Ranked users by score.
///
/// # Endpoint
/// `GET /api/leaderboard?limit=N`
///
/// Computing the leaderboard rewrites ranks for the returned users and may
/// trigger a due periodic reset. The entries show standings from before that
/// reset, while `lastReset` already reports it.
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = parse_limit(query.limit.as_deref())?;
    let view = state.activity().leaderboard(limit).await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        count: view.entries.len(),
        data: view.entries,
        last_reset: view.last_reset,
        server_time: state.now(),
    }))
}
