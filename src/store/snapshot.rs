//! JSON document persistence for the activity store.
//!
//! The whole store lives in one file. Unknown fields are ignored and missing
//! sections default to empty, so older and newer documents both load.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{ActivityEntry, LeaderboardEntry, UserRecord};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreDocument {
    pub users: Vec<UserRecord>,
    pub activities: Vec<ActivityEntry>,
    /// Last computed leaderboard, kept for clients that read the file directly.
    pub leaderboard: Vec<LeaderboardEntry>,
    pub last_reset: Option<DateTime<Utc>>,
}

/// Location of the persisted store document.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing file yields `None`.
    pub async fn load(&self) -> Result<Option<StoreDocument>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No store snapshot at {}, starting empty", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read store snapshot: {}", self.path.display())
                });
            }
        };

        let document: StoreDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store snapshot: {}", self.path.display()))?;

        info!(
            users = document.users.len(),
            "Loaded store snapshot from {}",
            self.path.display()
        );
        Ok(Some(document))
    }

    /// Writes the document to a sibling temp file, then renames it into place.
    pub async fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content =
            serde_json::to_vec_pretty(document).context("Failed to serialize store snapshot")?;

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(users = document.users.len(), "Store snapshot written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
