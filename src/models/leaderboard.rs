use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserRecord;

/// A user as they appear in one computed leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(flatten)]
    pub user: UserRecord,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_users: usize,
    pub active_today: usize,
    pub total_usage: u64,
    pub days_until_reset: i64,
    pub last_reset: DateTime<Utc>,
    pub next_reset: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetSummary {
    pub users_reset: usize,
    pub last_reset: DateTime<Utc>,
}
