use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Badge, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    pub join_date: DateTime<Utc>,
    #[serde(default)]
    pub total_usage: u64,
    #[serde(default)]
    pub active_days: u64,
    pub last_active: DateTime<Utc>,
    /// First-earned order, no duplicates.
    #[serde(default)]
    pub badges: Vec<Badge>,
    /// Position in the most recent leaderboard that included this user; 0 when unranked.
    #[serde(default)]
    pub rank: u32,
}

impl UserRecord {
    /// A freshly registered user. Registration counts as the first activity.
    #[must_use]
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            join_date: now,
            total_usage: 1,
            active_days: 1,
            last_active: now,
            badges: vec![Badge::Newbie],
            rank: 0,
        }
    }

    #[must_use]
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    /// Appends `badge` unless already held. Returns whether it was newly earned.
    pub fn award(&mut self, badge: Badge) -> bool {
        if self.has_badge(badge) {
            return false;
        }
        self.badges.push(badge);
        true
    }
}
