//! Default [`ActivityService`] backed by an in-process [`ActivityStore`].
//!
//! The store sits behind one async mutex. Each service call holds it for the
//! whole operation, so the register/rank/stats sequence of a login is never
//! interleaved with another writer. Snapshot writes happen outside the store
//! lock and are ordered by a separate write lock.

#![allow(
    clippy::cast_precision_loss,
    reason = "User counts fed to gauges stay far below f64 precision limits"
)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::clock::Clock;
use crate::config::Config;
use crate::domain::UserId;
use crate::models::{ActivityAction, ActivityEntry, ResetSummary, StoreStats, UserRecord};
use crate::services::activity_service::{
    ActivityError, ActivityService, LeaderboardView, LoginOutcome,
};
use crate::store::{ActivityStore, SnapshotFile, StoreOptions};

pub struct DefaultActivityService {
    store: Mutex<ActivityStore>,
    clock: Arc<dyn Clock>,
    snapshot: Option<SnapshotFile>,
    write_lock: Mutex<()>,
    dirty: AtomicBool,
    write_through: bool,
    default_limit: usize,
}

impl DefaultActivityService {
    /// Wraps an existing store.
    ///
    /// * `snapshot` - file to persist to, `None` for a memory-only store
    /// * `write_through` - persist after every mutation instead of waiting for [`Self::flush`]
    #[must_use]
    pub fn new(
        store: ActivityStore,
        clock: Arc<dyn Clock>,
        snapshot: Option<SnapshotFile>,
        write_through: bool,
        default_limit: usize,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
            snapshot,
            write_lock: Mutex::new(()),
            dirty: AtomicBool::new(false),
            write_through,
            default_limit,
        }
    }

    /// Builds the service from configuration, loading the snapshot if one exists.
    pub async fn open(config: &Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let options = StoreOptions::from_config(&config.leaderboard)?;
        let now = clock.now();

        let snapshot = config
            .store
            .persist
            .then(|| SnapshotFile::new(&config.store.path));

        let mut store = match &snapshot {
            Some(file) => match file.load().await? {
                Some(document) => ActivityStore::from_document(document, options, now),
                None => ActivityStore::new(options, now),
            },
            None => {
                info!("Store persistence disabled, keeping activity in memory");
                ActivityStore::new(options, now)
            }
        };

        let seeded = if config.store.seed_demo_users {
            store.seed_demo_users(now)
        } else {
            0
        };

        metrics::gauge!("upsen_users_total").set(store.users().len() as f64);

        let service = Self::new(
            store,
            clock,
            snapshot,
            config.store.flush_interval_seconds == 0,
            config.leaderboard.default_limit,
        );

        if seeded > 0 {
            service.mark_dirty();
            service.persist_if_write_through().await?;
        }

        Ok(service)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Call while holding the store lock, so a concurrent flush can't miss the change.
    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    async fn persist_if_write_through(&self) -> Result<(), ActivityError> {
        if self.write_through {
            self.flush().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityService for DefaultActivityService {
    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn record_activity(&self, user_id: UserId) -> Result<LoginOutcome, ActivityError> {
        let outcome = {
            let mut store = self.store.lock().await;
            let now = self.clock.now();
            let is_new = store.user(&user_id).is_none();

            let registered = store.register(user_id.clone(), now);
            self.mark_dirty();
            let board = store.compute_leaderboard(self.default_limit, now);
            let stats = store.stats(now);

            let action = if is_new {
                ActivityAction::Register
            } else {
                ActivityAction::Login
            };
            metrics::counter!("upsen_activity_recorded_total", "action" => action.to_string())
                .increment(1);
            metrics::gauge!("upsen_users_total").set(stats.total_users as f64);

            // The leaderboard copy carries rank badges earned just now.
            let ranked = board.into_iter().find(|e| e.user.user_id == user_id);
            let (user, rank) = match ranked {
                Some(entry) => {
                    let rank = entry.user.rank;
                    (entry.user, rank)
                }
                None => (registered, 0),
            };

            LoginOutcome {
                user,
                rank,
                total_users: stats.total_users,
            }
        };

        self.persist_if_write_through().await?;
        Ok(outcome)
    }

    async fn leaderboard(&self, limit: Option<usize>) -> Result<LeaderboardView, ActivityError> {
        let view = {
            let mut store = self.store.lock().await;
            let entries =
                store.compute_leaderboard(limit.unwrap_or(self.default_limit), self.clock.now());
            // Read after computing, so a lazy reset shows up here as it does in stats.
            let last_reset = store.last_reset();
            // Ranks, badges or a lazy reset may have changed stored records.
            self.mark_dirty();
            LeaderboardView {
                entries,
                last_reset,
            }
        };

        self.persist_if_write_through().await?;
        Ok(view)
    }

    async fn stats(&self) -> Result<StoreStats, ActivityError> {
        let store = self.store.lock().await;
        Ok(store.stats(self.clock.now()))
    }

    async fn user(&self, user_id: &UserId) -> Result<UserRecord, ActivityError> {
        let store = self.store.lock().await;
        store
            .user(user_id)
            .cloned()
            .ok_or_else(|| ActivityError::UserNotFound(user_id.clone()))
    }

    async fn recent_activities(&self, limit: usize) -> Result<Vec<ActivityEntry>, ActivityError> {
        let store = self.store.lock().await;
        Ok(store.recent_activities(limit))
    }

    async fn reset(&self) -> Result<ResetSummary, ActivityError> {
        let summary = {
            let mut store = self.store.lock().await;
            self.mark_dirty();
            store.reset(self.clock.now())
        };

        info!(users_reset = summary.users_reset, "Leaderboard reset");
        metrics::counter!("upsen_leaderboard_resets_total").increment(1);

        self.persist_if_write_through().await?;
        Ok(summary)
    }

    async fn flush(&self) -> Result<bool, ActivityError> {
        let Some(snapshot) = &self.snapshot else {
            self.dirty.store(false, Ordering::SeqCst);
            return Ok(false);
        };

        let _write_guard = self.write_lock.lock().await;

        let document = {
            let store = self.store.lock().await;
            if !self.dirty.swap(false, Ordering::SeqCst) {
                return Ok(false);
            }
            store.to_document()
        };

        let start = Instant::now();
        if let Err(e) = snapshot.save(&document).await {
            self.dirty.store(true, Ordering::SeqCst);
            error!(error = %format!("{e:#}"), "Failed to write store snapshot");
            metrics::counter!("upsen_snapshot_failures_total").increment(1);
            return Err(e.into());
        }

        metrics::histogram!("upsen_snapshot_write_seconds").record(start.elapsed().as_secs_f64());
        Ok(true)
    }
}
