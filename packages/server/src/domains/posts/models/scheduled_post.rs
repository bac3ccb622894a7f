use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::{Post, PostStatus};
use crate::common::{PostId, UserId};

/// The persisted projection of a scheduled post.
///
/// Only URL media survive scheduling; files are rejected up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPostRecord {
    pub id: PostId,
    pub author_id: UserId,
    pub content: Option<String>,
    pub page_ids: Vec<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub published_post_ids: Vec<String>,
}

impl ScheduledPostRecord {
    pub fn from_post(post: &Post, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            content: post.content.clone(),
            page_ids: post.page_ids.clone(),
            media_urls: post.media_urls.clone(),
            scheduled_at,
            status: PostStatus::Scheduled,
            created_at: post.created_at,
            last_error: None,
            published_post_ids: Vec::new(),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Scheduled && self.scheduled_at <= now
    }
}
