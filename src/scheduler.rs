//! Background jobs.
//!
//! The only recurring job persists the activity store. Leaderboard resets are
//! not scheduled here; they happen lazily on the first
//! leaderboard computation after the reset period (see [`crate::store`]).

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

use crate::config::StoreConfig;
use crate::services::ActivityService;

pub struct Scheduler {
    activity: Arc<dyn ActivityService>,
    config: StoreConfig,
    jobs: Option<JobScheduler>,
}

impl Scheduler {
    pub fn new(activity: Arc<dyn ActivityService>, config: StoreConfig) -> Self {
        Self {
            activity,
            config,
            jobs: None,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        if !self.config.persist {
            info!("Store persistence disabled, snapshot flush job not scheduled");
            return Ok(());
        }

        if self.config.flush_interval_seconds == 0 {
            info!("Store writes through on every change, snapshot flush job not scheduled");
            return Ok(());
        }

        let sched = JobScheduler::new().await?;
        let activity = Arc::clone(&self.activity);
        let every = Duration::from_secs(self.config.flush_interval_seconds);

        let job = Job::new_repeated_async(every, move |_uuid, _lock| {
            let activity = Arc::clone(&activity);
            Box::pin(async move {
                flush_snapshot(activity.as_ref()).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;
        info!(
            "Scheduler running, flushing store every {} seconds",
            self.config.flush_interval_seconds
        );

        self.jobs = Some(sched);
        Ok(())
    }

    /// Stops scheduled jobs and writes any pending changes one last time.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(mut sched) = self.jobs.take() {
            info!("Stopping scheduler...");
            sched.shutdown().await?;
        }

        if self.activity.flush().await? {
            info!("Pending store changes written on shutdown");
        }
        Ok(())
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.jobs.is_some()
    }
}

async fn flush_snapshot(activity: &dyn ActivityService) {
    let start = Instant::now();
    match activity.flush().await {
        Ok(true) => info!(
            event = "job_finished",
            job_name = "flush_store",
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Store snapshot flushed"
        ),
        Ok(false) => debug!(job_name = "flush_store", "Store unchanged, nothing to flush"),
        Err(e) => {
            error!(event = "job_failed", job_name = "flush_store", error = %e, "Scheduled store flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::services::DefaultActivityService;
    use crate::store::{ActivityStore, StoreOptions};
    use chrono::Utc;

    fn memory_service() -> Arc<dyn ActivityService> {
        Arc::new(DefaultActivityService::new(
            ActivityStore::new(StoreOptions::default(), Utc::now()),
            Arc::new(SystemClock),
            None,
            false,
            50,
        ))
    }

    #[tokio::test]
    async fn test_no_job_without_persistence() {
        let config = StoreConfig {
            persist: false,
            ..StoreConfig::default()
        };
        let mut scheduler = Scheduler::new(memory_service(), config);
        scheduler.start().await.unwrap();
        assert!(!scheduler.is_running());
        scheduler.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_no_job_when_writing_through() {
        let config = StoreConfig {
            flush_interval_seconds: 0,
            ..StoreConfig::default()
        };
        let mut scheduler = Scheduler::new(memory_service(), config);
        scheduler.start().await.unwrap();
        assert!(!scheduler.is_running());
    }
}
