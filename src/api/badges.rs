use axum::Json;

use super::ApiResponse;
use crate::domain::{Badge, BadgeInfo};

/// # Endpoint
/// `GET /api/badges`
pub async fn list_badges() -> Json<ApiResponse<Vec<BadgeInfo>>> {
    Json(ApiResponse::success(Badge::catalog()))
}
