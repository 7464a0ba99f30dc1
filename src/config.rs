use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::limits::{
    DEFAULT_ACTIVITY_LOG_CAPACITY, DEFAULT_LEADERBOARD_LIMIT, DEFAULT_RESET_PERIOD_DAYS,
    MAX_LEADERBOARD_LIMIT,
};

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "UPSEN_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub store: StoreConfig,

    pub leaderboard: LeaderboardConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Emit logs as JSON lines instead of human readable text
    pub json_logs: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub host: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Key required by administrative endpoints (`X-Api-Key` or bearer token).
    /// Administrative endpoints reject every request while this is unset.
    pub admin_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
            admin_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Keep the store in a JSON snapshot file. When false it lives only in memory.
    pub persist: bool,

    pub path: String,

    /// Seconds between background flushes of a changed store.
    /// 0 writes the snapshot after every change instead.
    pub flush_interval_seconds: u64,

    /// Populate an empty store with sample users for local development
    pub seed_demo_users: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist: true,
            path: "data/upsen.json".to_string(),
            flush_interval_seconds: 30,
            seed_demo_users: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub default_limit: usize,

    /// Counters are cleared once this many days pass since the last reset
    pub reset_period_days: u32,

    pub activity_log_capacity: usize,

    /// Offset from UTC that defines calendar days for active-day counting
    pub utc_offset_minutes: i32,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LEADERBOARD_LIMIT,
            reset_period_days: DEFAULT_RESET_PERIOD_DAYS,
            activity_log_capacity: DEFAULT_ACTIVITY_LOG_CAPACITY,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "upsen".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(explicit);
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return Self::load_from_path(&path);
        }

        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("upsen").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".upsen").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let leaderboard = &self.leaderboard;

        if leaderboard.reset_period_days == 0 {
            anyhow::bail!("Leaderboard reset period must be at least one day");
        }

        if !(1..=MAX_LEADERBOARD_LIMIT).contains(&leaderboard.default_limit) {
            anyhow::bail!(
                "Default leaderboard limit must be between 1 and {MAX_LEADERBOARD_LIMIT}"
            );
        }

        if leaderboard.activity_log_capacity == 0 {
            anyhow::bail!("Activity log capacity must be greater than 0");
        }

        // chrono only accepts offsets strictly inside +/- 24h
        if leaderboard.utc_offset_minutes.abs() >= 24 * 60 {
            anyhow::bail!(
                "UTC offset must be within +/- 1439 minutes, got {}",
                leaderboard.utc_offset_minutes
            );
        }

        if self.store.persist && self.store.path.trim().is_empty() {
            anyhow::bail!("Store path cannot be empty when persistence is enabled");
        }

        if self.server.admin_api_key.as_deref().is_some_and(str::is_empty) {
            anyhow::bail!("Admin API key cannot be empty when set");
        }

        Ok(())
    }
}
