use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::parse_limit;
use super::{ApiError, ApiResponse, AppState};
use crate::constants::limits::DEFAULT_ACTIVITY_LIMIT;
use crate::models::ActivityEntry;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<String>,
}

/// Most recent registrations and logins, newest first.
///
/// # Endpoint
/// `GET /api/activities?limit=N`
pub async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityEntry>>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref())?.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    let activities = state.activity().recent_activities(limit).await?;
    Ok(Json(ApiResponse::success(activities)))
}
