//! Persistence for pending scheduled posts.
//!
//! The store keeps the whole list in one JSON document, the same shape a
//! browser client would keep in local storage. `ScheduleQueue` serialises
//! read-modify-write cycles inside this process; nothing coordinates across
//! processes, so two servers sharing a file can dispatch a post twice.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::models::{PostStatus, ScheduledPostRecord};
use crate::common::PostId;
use crate::kernel::BaseScheduleStore;

/// Scheduled posts stored as a JSON array in a single file.
pub struct JsonFileScheduleStore {
    path: PathBuf,
}

impl JsonFileScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaseScheduleStore for JsonFileScheduleStore {
    async fn load_all(&self) -> Result<Vec<ScheduledPostRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing scheduled posts in {}", self.path.display()))
    }

    async fn save_all(&self, records: &[ScheduledPostRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

/// Serialised access to a schedule store.
pub struct ScheduleQueue {
    store: Arc<dyn BaseScheduleStore>,
    lock: Mutex<()>,
}

impl ScheduleQueue {
    pub fn new(store: Arc<dyn BaseScheduleStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub async fn enqueue(&self, record: ScheduledPostRecord) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load_all().await?;
        records.push(record);
        self.store.save_all(&records).await
    }

    /// Every record, in stored order.
    pub async fn all(&self) -> Result<Vec<ScheduledPostRecord>> {
        let _guard = self.lock.lock().await;
        self.store.load_all().await
    }

    /// Records still waiting to be published, soonest first.
    pub async fn pending(&self) -> Result<Vec<ScheduledPostRecord>> {
        let mut pending: Vec<_> = self
            .all()
            .await?
            .into_iter()
            .filter(|r| r.status == PostStatus::Scheduled)
            .collect();
        pending.sort_by_key(|r| r.scheduled_at);
        Ok(pending)
    }

    pub async fn due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledPostRecord>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|r| r.is_due(now))
            .collect())
    }

    /// Re-read the list, apply `f` to one record and write it back.
    ///
    /// Returns `false` if the record is gone.
    pub async fn update<F>(&self, id: PostId, f: F) -> Result<bool>
    where
        F: FnOnce(&mut ScheduledPostRecord) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load_all().await?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        f(record);
        self.store.save_all(&records).await?;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.store.clear().await
    }
}
