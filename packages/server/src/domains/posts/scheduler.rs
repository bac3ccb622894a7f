//! Polling dispatcher for scheduled posts.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use super::models::{PostStatus, ScheduledPostRecord};
use super::schedule_store::ScheduleQueue;
use crate::common::{ErrorKind, PostId};
use crate::domains::publishing::media::validate_media_url;
use crate::domains::publishing::{
    distribute_post, Distribution, MediaItem, PublishError, TracingObserver,
};
use crate::kernel::{BaseFacebookGraph, BasePageCredentialStore, BasePostStore};

/// Reasons a post cannot be put on the schedule.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Videos cannot be scheduled; publish them immediately")]
    VideoNotSchedulable,

    #[error("Scheduled posts can only use hosted media URLs, not uploaded file {0}")]
    ScheduledMediaRequiresUrl(String),

    #[error("Scheduled time {0} is not in the future")]
    ScheduledInPast(DateTime<Utc>),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::VideoNotSchedulable => ErrorKind::VideoNotSchedulable,
            ScheduleError::ScheduledMediaRequiresUrl(_) => ErrorKind::ScheduledMediaRequiresUrl,
            ScheduleError::ScheduledInPast(_) => ErrorKind::Validation,
            ScheduleError::Publish(e) => e.kind(),
        }
    }
}

/// Check a post against the scheduling policy and return its media URLs.
///
/// Files cannot outlive the request that carried them, so only hosted URLs
/// are accepted.
pub fn validate_schedule(
    media: &[MediaItem],
    scheduled_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<String>, ScheduleError> {
    if scheduled_at <= now {
        return Err(ScheduleError::ScheduledInPast(scheduled_at));
    }

    media
        .iter()
        .map(|item| match item {
            MediaItem::File(file) if item.is_video_file() => {
                tracing::debug!(file_name = %file.file_name, "Rejecting scheduled video");
                Err(ScheduleError::VideoNotSchedulable)
            }
            MediaItem::File(file) => Err(ScheduleError::ScheduledMediaRequiresUrl(
                file.file_name.clone(),
            )),
            MediaItem::Url(url) => {
                validate_media_url(url)?;
                Ok(url.trim().to_string())
            }
        })
        .collect()
}

/// Counts from one scheduler pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub published: usize,
    pub failed: usize,
    /// Dispatched entries whose new status could not be written to the
    /// schedule store; they are held in memory and written on a later tick.
    pub unsaved: usize,
}

/// Result of one dispatch, waiting to be written back.
#[derive(Debug, Clone)]
struct Outcome {
    status: PostStatus,
    post_ids: Vec<String>,
    error: Option<String>,
}

/// Publishes due entries from the schedule store.
pub struct PostScheduler {
    queue: Arc<ScheduleQueue>,
    credentials: Arc<dyn BasePageCredentialStore>,
    graph: Arc<dyn BaseFacebookGraph>,
    posts: Arc<dyn BasePostStore>,
    /// Held for the whole tick. Entries dispatched but not yet marked in the
    /// store live here and are never dispatched again.
    unsaved: Mutex<HashMap<PostId, Outcome>>,
}

impl PostScheduler {
    pub fn new(
        queue: Arc<ScheduleQueue>,
        credentials: Arc<dyn BasePageCredentialStore>,
        graph: Arc<dyn BaseFacebookGraph>,
        posts: Arc<dyn BasePostStore>,
    ) -> Self {
        Self {
            queue,
            credentials,
            graph,
            posts,
            unsaved: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch every entry due at `now` exactly once.
    ///
    /// An entry leaves the `scheduled` state in the same pass that dispatched
    /// it. If that write fails the outcome is kept in memory, the entry is
    /// skipped by later passes and the write is retried at the start of each
    /// tick. Overlapping ticks are skipped.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let Ok(mut unsaved) = self.unsaved.try_lock() else {
            tracing::debug!("Previous scheduler tick still running; skipping");
            return Ok(TickReport::default());
        };

        self.flush_unsaved(&mut unsaved).await;

        let due: Vec<_> = self
            .queue
            .due(now)
            .await?
            .into_iter()
            .filter(|r| !unsaved.contains_key(&r.id))
            .collect();
        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };
        if due.is_empty() {
            report.unsaved = unsaved.len();
            return Ok(report);
        }

        tracing::info!(count = due.len(), "Dispatching scheduled posts");

        for record in due {
            let outcome = match self.dispatch(&record).await {
                Ok(post_ids) => {
                    report.published += 1;
                    Outcome {
                        status: PostStatus::Published,
                        post_ids,
                        error: None,
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        post_id = %record.id,
                        kind = ?e.kind(),
                        error = %e,
                        "Scheduled post failed"
                    );
                    Outcome {
                        status: PostStatus::Failed,
                        post_ids: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };

            self.record_history(record.id, &outcome).await;
            if let Err(e) = self.mark(record.id, &outcome).await {
                tracing::error!(
                    post_id = %record.id,
                    status = ?outcome.status,
                    error = %e,
                    "Could not update schedule store; holding outcome in memory"
                );
                unsaved.insert(record.id, outcome);
            }
        }

        report.unsaved = unsaved.len();
        Ok(report)
    }

    async fn dispatch(&self, record: &ScheduledPostRecord) -> Result<Vec<String>, PublishError> {
        let media: Vec<MediaItem> = record
            .media_urls
            .iter()
            .cloned()
            .map(MediaItem::Url)
            .collect();

        let post = Distribution {
            user_id: record.author_id,
            page_ids: &record.page_ids,
            content: record.content.as_deref(),
            media: &media,
        };
        distribute_post(post, &*self.credentials, &*self.graph, &TracingObserver).await
    }

    /// Retry schedule-store writes left over from earlier ticks.
    async fn flush_unsaved(&self, unsaved: &mut HashMap<PostId, Outcome>) {
        let ids: Vec<PostId> = unsaved.keys().copied().collect();
        for id in ids {
            let Some(outcome) = unsaved.get(&id) else {
                continue;
            };
            match self.mark(id, outcome).await {
                Ok(()) => {
                    tracing::info!(post_id = %id, "Held scheduled post outcome written");
                    unsaved.remove(&id);
                }
                Err(e) => {
                    tracing::warn!(post_id = %id, error = %e, "Schedule store still unavailable");
                }
            }
        }
    }

    async fn mark(&self, id: PostId, outcome: &Outcome) -> Result<()> {
        let status = outcome.status;
        let ids = outcome.post_ids.clone();
        let last_error = outcome.error.clone();
        let found = self
            .queue
            .update(id, move |r| {
                r.status = status;
                r.published_post_ids = ids;
                r.last_error = last_error;
            })
            .await?;
        if !found {
            tracing::warn!(post_id = %id, "Scheduled post vanished before it could be marked");
        }
        Ok(())
    }

    // History is secondary to the schedule store; a failed write is logged only.
    async fn record_history(&self, id: PostId, outcome: &Outcome) {
        if let Err(e) = self
            .posts
            .record_outcome(id, outcome.status, &outcome.post_ids, outcome.error.as_deref())
            .await
        {
            tracing::warn!(post_id = %id, error = %e, "Failed to record scheduled post outcome");
        }
    }
}
