use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::services::{ActivityService, DefaultActivityService};

/// Long-lived services, created once at startup and shared by the HTTP
/// server, the scheduler and CLI commands.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub clock: Arc<dyn Clock>,

    pub activity: Arc<dyn ActivityService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn with_clock(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let activity = DefaultActivityService::open(&config, Arc::clone(&clock)).await?;

        Ok(Self {
            config: Arc::new(config),
            clock,
            activity: Arc::new(activity),
        })
    }
}
