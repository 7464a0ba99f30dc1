//! In-process activity store.
//!
//! Holds user records and the capped activity log, and derives scores,
//! badges and leaderboards from them. Every operation is synchronous and
//! takes the evaluation instant as an argument; callers are responsible for
//! serializing access (see [`crate::services::DefaultActivityService`]).
//!
//! # Reset policy
//!
//! Resets are lazy: nothing fires on a timer. The first leaderboard
//! computation at or after `last_reset + reset_period` zeroes every user's
//! counters, after the leaderboard for that request has been built.

pub mod snapshot;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

use crate::config::LeaderboardConfig;
use crate::constants::limits::{DEFAULT_ACTIVITY_LOG_CAPACITY, DEFAULT_RESET_PERIOD_DAYS};
use crate::constants::scoring::{ACTIVE_DAY_WEIGHT, MILLIS_PER_DAY, RECENCY_MAX, USAGE_WEIGHT};
use crate::domain::{Badge, UserId};
use crate::models::{
    ActivityAction, ActivityEntry, LeaderboardEntry, ResetSummary, StoreStats, UserRecord,
};

pub use snapshot::{SnapshotFile, StoreDocument};

/// Tunables for an [`ActivityStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub reset_period: Duration,
    pub activity_capacity: usize,
    /// Offset used to decide which calendar day an instant falls on.
    pub day_offset: FixedOffset,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            reset_period: Duration::days(i64::from(DEFAULT_RESET_PERIOD_DAYS)),
            activity_capacity: DEFAULT_ACTIVITY_LOG_CAPACITY,
            day_offset: Utc.fix(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &LeaderboardConfig) -> anyhow::Result<Self> {
        let day_offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!("Invalid UTC offset: {} minutes", config.utc_offset_minutes)
        })?;

        Ok(Self {
            reset_period: Duration::days(i64::from(config.reset_period_days)),
            activity_capacity: config.activity_log_capacity,
            day_offset,
        })
    }
}

/// Score of a user at `now`: volume, consistency and recency.
///
/// Recency decays linearly from 100 to 0 over 100 days. A `last_active`
/// in the future counts as zero days elapsed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(user: &UserRecord, now: DateTime<Utc>) -> f64 {
    let elapsed_ms = (now - user.last_active).num_milliseconds().max(0);
    let days_since = elapsed_ms as f64 / MILLIS_PER_DAY;
    let recency = (RECENCY_MAX - days_since).max(0.0);

    user.total_usage as f64 * USAGE_WEIGHT + user.active_days as f64 * ACTIVE_DAY_WEIGHT + recency
}

pub struct ActivityStore {
    users: Vec<UserRecord>,
    index: HashMap<UserId, usize>,
    activities: VecDeque<ActivityEntry>,
    leaderboard: Vec<LeaderboardEntry>,
    last_reset: DateTime<Utc>,
    options: StoreOptions,
}

impl ActivityStore {
    #[must_use]
    pub fn new(options: StoreOptions, now: DateTime<Utc>) -> Self {
        Self {
            users: Vec::new(),
            index: HashMap::new(),
            activities: VecDeque::new(),
            leaderboard: Vec::new(),
            last_reset: now,
            options,
        }
    }

    /// Rebuilds a store from a persisted document.
    ///
    /// Duplicate user ids keep the first record. The activity log is trimmed
    /// to capacity, keeping the newest entries.
    #[must_use]
    pub fn from_document(document: StoreDocument, options: StoreOptions, now: DateTime<Utc>) -> Self {
        let mut store = Self::new(options, document.last_reset.unwrap_or(now));

        for user in document.users {
            if store.index.contains_key(&user.user_id) {
                warn!(user_id = %user.user_id, "Skipping duplicate user record in snapshot");
                continue;
            }
            store.index.insert(user.user_id.clone(), store.users.len());
            store.users.push(user);
        }

        store.activities = document.activities.into();
        store.trim_activities();
        store.leaderboard = document.leaderboard;

        debug!(
            users = store.users.len(),
            activities = store.activities.len(),
            "Loaded activity store from snapshot"
        );
        store
    }

    #[must_use]
    pub fn to_document(&self) -> StoreDocument {
        StoreDocument {
            users: self.users.clone(),
            activities: self.activities.iter().cloned().collect(),
            leaderboard: self.leaderboard.clone(),
            last_reset: Some(self.last_reset),
        }
    }

    #[must_use]
    pub const fn options(&self) -> &StoreOptions {
        &self.options
    }

    #[must_use]
    pub const fn last_reset(&self) -> DateTime<Utc> {
        self.last_reset
    }

    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    #[must_use]
    pub fn user(&self, user_id: &UserId) -> Option<&UserRecord> {
        self.index.get(user_id).map(|&i| &self.users[i])
    }

    /// Last computed leaderboard. Advisory only; recomputed on every request.
    #[must_use]
    pub fn cached_leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Records one activity for `user_id`, creating the user on first sight.
    pub fn register(&mut self, user_id: UserId, now: DateTime<Utc>) -> UserRecord {
        if let Some(&i) = self.index.get(&user_id) {
            let previous_day = self.calendar_day(self.users[i].last_active);
            let today = self.calendar_day(now);

            let user = &mut self.users[i];
            user.total_usage += 1;
            if previous_day != today {
                user.active_days += 1;
            }
            user.last_active = now;
            award_counter_badges(user);

            let updated = user.clone();
            self.record_activity(user_id, ActivityAction::Login, now);
            return updated;
        }

        let user = UserRecord::new(user_id.clone(), now);
        info!(user_id = %user_id, "New user registered");

        self.index.insert(user_id.clone(), self.users.len());
        self.users.push(user.clone());
        self.record_activity(user_id, ActivityAction::Register, now);
        user
    }

    fn record_activity(&mut self, user_id: UserId, action: ActivityAction, now: DateTime<Utc>) {
        self.activities.push_back(ActivityEntry {
            user_id,
            action,
            timestamp: now,
        });
        self.trim_activities();
    }

    fn trim_activities(&mut self) {
        let capacity = self.options.activity_capacity;
        if self.activities.len() > capacity {
            let excess = self.activities.len() - capacity;
            self.activities.drain(..excess);
        }
    }

    /// Newest first.
    #[must_use]
    pub fn recent_activities(&self, limit: usize) -> Vec<ActivityEntry> {
        self.activities.iter().rev().take(limit).cloned().collect()
    }

    /// Ranks users by descending score and returns the top `limit`.
    ///
    /// Only the returned users get their stored `rank` rewritten and their
    /// rank badges evaluated; anyone below the cut keeps whatever rank they
    /// had before. Runs a due reset after the result is built, so the result
    /// shows standings from before the reset.
    pub fn compute_leaderboard(&mut self, limit: usize, now: DateTime<Utc>) -> Vec<LeaderboardEntry> {
        let mut scored: Vec<(usize, f64)> = self
            .users
            .iter()
            .enumerate()
            .map(|(i, user)| (i, score(user, now)))
            .collect();

        // Vec::sort_by is stable, so equal scores keep storage order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        let mut entries = Vec::with_capacity(scored.len());
        for (position, (i, score)) in scored.into_iter().enumerate() {
            let user = &mut self.users[i];
            user.rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
            award_counter_badges(user);
            for badge in Badge::earned_by_rank(user.rank) {
                if user.award(badge) {
                    debug!(user_id = %user.user_id, %badge, "Rank badge awarded");
                }
            }
            entries.push(LeaderboardEntry {
                user: user.clone(),
                score,
            });
        }

        self.leaderboard.clone_from(&entries);

        if self.is_reset_due(now) {
            let summary = self.reset(now);
            info!(
                users_reset = summary.users_reset,
                "Reset period elapsed, leaderboard counters cleared"
            );
        }

        entries
    }

    #[must_use]
    pub fn is_reset_due(&self, now: DateTime<Utc>) -> bool {
        now - self.last_reset >= self.options.reset_period
    }

    /// Zeroes usage, active days and rank for every user. Badges survive.
    pub fn reset(&mut self, now: DateTime<Utc>) -> ResetSummary {
        self.last_reset = now;
        for user in &mut self.users {
            user.total_usage = 0;
            user.active_days = 0;
            user.rank = 0;
        }

        ResetSummary {
            users_reset: self.users.len(),
            last_reset: now,
        }
    }

    #[must_use]
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.last_reset + self.options.reset_period
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn stats(&self, now: DateTime<Utc>) -> StoreStats {
        let today = self.calendar_day(now);
        let active_today = self
            .users
            .iter()
            .filter(|u| self.calendar_day(u.last_active) == today)
            .count();

        let next_reset = self.next_reset();
        let remaining_ms = (next_reset - now).num_milliseconds() as f64;
        let days_until_reset = (remaining_ms / MILLIS_PER_DAY).ceil() as i64;

        StoreStats {
            total_users: self.users.len(),
            active_today,
            total_usage: self.users.iter().map(|u| u.total_usage).sum(),
            days_until_reset,
            last_reset: self.last_reset,
            next_reset,
        }
    }

    /// Inserts a handful of sample users into an empty store.
    ///
    /// Returns how many users were added; a non-empty store is left alone.
    pub fn seed_demo_users(&mut self, now: DateTime<Utc>) -> usize {
        if !self.users.is_empty() {
            return 0;
        }

        let samples: [(&str, i64, u64, u64, &[Badge]); 5] = [
            (
                "admin",
                0,
                1000,
                30,
                &[Badge::Champion, Badge::PowerUser, Badge::Top10],
            ),
            ("user123", 7, 500, 20, &[Badge::HeavyUser, Badge::WeeklyHero]),
            ("termux_user", 3, 100, 3, &[Badge::Newbie]),
            ("android_user", 1, 50, 1, &[Badge::Newbie]),
            ("hacker", 14, 800, 14, &[Badge::PowerUser, Badge::Top10]),
        ];

        for (position, (name, joined_days_ago, usage, days, badges)) in
            samples.into_iter().enumerate()
        {
            let Ok(user_id) = UserId::parse(name) else {
                continue;
            };
            self.index.insert(user_id.clone(), self.users.len());
            self.users.push(UserRecord {
                user_id,
                join_date: now - Duration::days(joined_days_ago),
                total_usage: usage,
                active_days: days,
                last_active: now,
                badges: badges.to_vec(),
                rank: u32::try_from(position + 1).unwrap_or(u32::MAX),
            });
        }

        info!(users = self.users.len(), "Seeded demo users");
        self.users.len()
    }

    fn calendar_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.options.day_offset).date_naive()
    }
}

fn award_counter_badges(user: &mut UserRecord) {
    for badge in Badge::earned_by_counters(user.total_usage, user.active_days) {
        if user.award(badge) {
            debug!(user_id = %user.user_id, %badge, "Badge awarded");
        }
    }
}
