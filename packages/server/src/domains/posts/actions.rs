//! Post creation: publish now or put on the schedule.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use typed_builder::TypedBuilder;

use super::models::{Post, PostStatus, ScheduledPostRecord};
use super::scheduler::{validate_schedule, ScheduleError};
use crate::common::{ErrorKind, UserId};
use crate::domains::publishing::{
    distribute_post, Distribution, MediaItem, PublishError, TracingObserver,
};
use crate::kernel::ServerDeps;

/// A post as submitted from the compose form.
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewPost {
    pub author_id: UserId,
    pub page_ids: Vec<String>,
    #[builder(default, setter(strip_option, into))]
    pub content: Option<String>,
    #[builder(default)]
    pub media: Vec<MediaItem>,
    #[builder(default, setter(strip_option))]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PostOutcome {
    Published {
        post: Post,
        post_ids: Vec<String>,
        requested: usize,
        published: usize,
    },
    Scheduled {
        post: Post,
    },
}

#[derive(Error, Debug)]
pub enum PostError {
    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::Publish(e) => e.kind(),
            PostError::Schedule(e) => e.kind(),
            PostError::Storage(_) => ErrorKind::Internal,
        }
    }
}

/// Create a post and either distribute it now or schedule it.
///
/// Immediate posts are recorded as drafts first, then updated with the
/// outcome. Partial success counts as published; the caller sees how many
/// Pages actually received it.
pub async fn create_post(input: NewPost, deps: &ServerDeps) -> Result<PostOutcome, PostError> {
    let content = input
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    if input.page_ids.is_empty() {
        return Err(PublishError::NoPagesSelected.into());
    }
    if content.is_none() && input.media.is_empty() {
        return Err(PublishError::EmptyPost.into());
    }

    match input.scheduled_at {
        Some(at) => schedule_post(input.author_id, content, input.page_ids, &input.media, at, deps).await,
        None => publish_now(input.author_id, content, input.page_ids, &input.media, deps).await,
    }
}

async fn schedule_post(
    author_id: UserId,
    content: Option<String>,
    page_ids: Vec<String>,
    media: &[MediaItem],
    scheduled_at: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<PostOutcome, PostError> {
    let media_urls = validate_schedule(media, scheduled_at, Utc::now())?;

    let mut post = Post::draft(author_id, content, page_ids, media_urls);
    post.status = PostStatus::Scheduled;
    post.scheduled_at = Some(scheduled_at);

    deps.posts.insert(&post).await?;
    if let Err(e) = deps
        .schedule
        .enqueue(ScheduledPostRecord::from_post(&post, scheduled_at))
        .await
    {
        // Without a queue entry the post will never go out.
        let message = format!("Could not be added to the schedule: {e}");
        if let Err(store_err) = deps
            .posts
            .record_outcome(post.id, PostStatus::Failed, &[], Some(&message))
            .await
        {
            tracing::warn!(post_id = %post.id, error = %store_err, "Failed to record schedule failure");
        }
        return Err(e.into());
    }

    tracing::info!(
        post_id = %post.id,
        scheduled_at = %scheduled_at,
        pages = post.page_ids.len(),
        "Post scheduled"
    );
    Ok(PostOutcome::Scheduled { post })
}

async fn publish_now(
    author_id: UserId,
    content: Option<String>,
    page_ids: Vec<String>,
    media: &[MediaItem],
    deps: &ServerDeps,
) -> Result<PostOutcome, PostError> {
    let media_urls = media
        .iter()
        .filter_map(|item| match item {
            MediaItem::Url(url) => Some(url.trim().to_string()),
            MediaItem::File(_) => None,
        })
        .collect();

    let mut post = Post::draft(author_id, content, page_ids, media_urls);
    deps.posts.insert(&post).await?;

    let distribution = Distribution {
        user_id: author_id,
        page_ids: &post.page_ids,
        content: post.content.as_deref(),
        media,
    };
    let result = distribute_post(
        distribution,
        &*deps.page_credentials,
        &*deps.facebook,
        &TracingObserver,
    )
    .await;

    match result {
        Ok(post_ids) => {
            // The posts are live on Facebook; a lost history write must not
            // make the caller think otherwise and publish again.
            if let Err(store_err) = deps
                .posts
                .record_outcome(post.id, PostStatus::Published, &post_ids, None)
                .await
            {
                tracing::warn!(
                    post_id = %post.id,
                    facebook_post_ids = ?post_ids,
                    error = %store_err,
                    "Post published but history was not updated"
                );
            }
            post.status = PostStatus::Published;
            post.facebook_post_ids = post_ids.clone();
            post.published_at = Some(Utc::now());

            Ok(PostOutcome::Published {
                requested: post.page_ids.len(),
                published: post_ids.len(),
                post,
                post_ids,
            })
        }
        Err(e) => {
            let message = e.to_string();
            if let Err(store_err) = deps
                .posts
                .record_outcome(post.id, PostStatus::Failed, &[], Some(&message))
                .await
            {
                tracing::warn!(post_id = %post.id, error = %store_err, "Failed to record post failure");
            }
            Err(e.into())
        }
    }
}
