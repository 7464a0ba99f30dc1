//! Domain service for activity tracking.
//!
//! The HTTP layer and the CLI talk to the store only through
//! [`ActivityService`], which owns locking, time and persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;
use crate::models::{ActivityEntry, LeaderboardEntry, ResetSummary, StoreStats, UserRecord};

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ActivityError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Result of recording one activity, with the user's resulting position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user: UserRecord,
    /// Position in the default-sized leaderboard, 0 when outside it.
    pub rank: u32,
    pub total_users: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView {
    pub entries: Vec<LeaderboardEntry>,
    pub last_reset: DateTime<Utc>,
}

#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Registers one activity, then ranks the user against everyone else.
    async fn record_activity(&self, user_id: UserId) -> Result<LoginOutcome, ActivityError>;

    /// Computes a fresh leaderboard. May trigger a due reset.
    async fn leaderboard(&self, limit: Option<usize>) -> Result<LeaderboardView, ActivityError>;

    async fn stats(&self) -> Result<StoreStats, ActivityError>;

    async fn user(&self, user_id: &UserId) -> Result<UserRecord, ActivityError>;

    async fn recent_activities(&self, limit: usize) -> Result<Vec<ActivityEntry>, ActivityError>;

    async fn reset(&self) -> Result<ResetSummary, ActivityError>;

    /// Writes pending changes to the snapshot. Returns whether anything was written.
    async fn flush(&self) -> Result<bool, ActivityError>;
}
