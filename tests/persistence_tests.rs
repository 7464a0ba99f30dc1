use chrono::{Duration, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use upsen::clock::{Clock, ManualClock};
use upsen::config::Config;
use upsen::domain::UserId;
use upsen::services::ActivityService;
use upsen::state::SharedState;

fn temp_snapshot_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("upsen-it-{}", uuid::Uuid::new_v4()))
        .join("store.json")
}

fn persistent_config(path: &Path, flush_interval_seconds: u64) -> Config {
    let mut config = Config::default();
    config.store.persist = true;
    config.store.path = path.to_string_lossy().into_owned();
    config.store.flush_interval_seconds = flush_interval_seconds;
    config
}

fn uid(raw: &str) -> UserId {
    UserId::parse(raw).unwrap()
}

#[tokio::test]
async fn test_state_survives_restart() {
    let path = temp_snapshot_path();
    let config = persistent_config(&path, 30);

    let state = SharedState::new(config.clone()).await.unwrap();
    state.activity.record_activity(uid("alice")).await.unwrap();
    state.activity.record_activity(uid("alice")).await.unwrap();
    state.activity.record_activity(uid("bob")).await.unwrap();

    // Nothing on disk until the flush runs.
    assert!(!path.exists());
    assert!(state.activity.flush().await.unwrap());
    assert!(!state.activity.flush().await.unwrap());
    drop(state);

    let reopened = SharedState::new(config).await.unwrap();
    let alice = reopened.activity.user(&uid("alice")).await.unwrap();
    assert_eq!(alice.total_usage, 2);

    let stats = reopened.activity.stats().await.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_usage, 3);

    let activities = reopened.activity.recent_activities(10).await.unwrap();
    assert_eq!(activities.len(), 3);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_write_through_persists_every_change() {
    let path = temp_snapshot_path();
    let config = persistent_config(&path, 0);

    let state = SharedState::new(config.clone()).await.unwrap();
    state.activity.record_activity(uid("carol")).await.unwrap();
    assert!(path.exists());

    let reopened = SharedState::new(config).await.unwrap();
    assert!(reopened.activity.user(&uid("carol")).await.is_ok());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_periodic_reset_after_leaderboard() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));

    let mut config = Config::default();
    config.store.persist = false;
    config.leaderboard.reset_period_days = 30;

    let state = SharedState::with_clock(config, clock.clone()).await.unwrap();
    state.activity.record_activity(uid("dave")).await.unwrap();

    clock.advance(Duration::days(31));

    let view = state.activity.leaderboard(None).await.unwrap();
    // The returned standings predate the reset, the reset time does not.
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].user.total_usage, 1);
    assert_eq!(view.last_reset, clock.now());

    let dave = state.activity.user(&uid("dave")).await.unwrap();
    assert_eq!(dave.total_usage, 0);
    assert_eq!(dave.active_days, 0);

    let stats = state.activity.stats().await.unwrap();
    assert_eq!(stats.last_reset, view.last_reset);
    assert_eq!(stats.days_until_reset, 30);
}
