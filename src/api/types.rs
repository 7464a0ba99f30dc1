use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Badge;
use crate::models::{LeaderboardEntry, StoreStats};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The recorded user as returned to the reporting client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserDto {
    pub user_id: String,
    pub rank: u32,
    pub total_usage: u64,
    pub active_days: u64,
    pub badges: Vec<Badge>,
    pub last_active: DateTime<Utc>,
    pub join_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatsDto {
    pub total_users: usize,
    pub user_rank: u32,
    /// `"<rank>/<total users>"`
    pub leaderboard_position: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: LoginUserDto,
    pub stats: LoginStatsDto,
    pub server_time: DateTime<Utc>,
    pub api_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub success: bool,
    pub data: Vec<LeaderboardEntry>,
    pub count: usize,
    pub last_reset: DateTime<Utc>,
    pub server_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: StoreStats,
    pub server_time: DateTime<Utc>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub total_users: usize,
    pub persistence: bool,
    pub next_reset: DateTime<Utc>,
}
