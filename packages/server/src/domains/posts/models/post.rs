use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{PostId, UserId};
use crate::kernel::BasePostStore;

/// Post status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Failed,
}

/// A post as recorded in history. Media files are never stored, only URLs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub content: Option<String>,
    pub page_ids: Vec<String>,
    pub media_urls: Vec<String>,
    pub status: PostStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub facebook_post_ids: Vec<String>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn draft(
        author_id: UserId,
        content: Option<String>,
        page_ids: Vec<String>,
        media_urls: Vec<String>,
    ) -> Self {
        Self {
            id: PostId::new(),
            author_id,
            content,
            page_ids,
            media_urls,
            status: PostStatus::Draft,
            scheduled_at: None,
            facebook_post_ids: Vec::new(),
            last_error: None,
            created_at: Utc::now(),
            published_at: None,
        }
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Post {
    pub async fn insert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, content, page_ids, media_urls, status,
                               scheduled_at, facebook_post_ids, last_error, created_at, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(self.id)
        .bind(self.author_id)
        .bind(&self.content)
        .bind(&self.page_ids)
        .bind(&self.media_urls)
        .bind(self.status)
        .bind(self.scheduled_at)
        .bind(&self.facebook_post_ids)
        .bind(&self.last_error)
        .bind(self.created_at)
        .bind(self.published_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update_outcome(
        id: PostId,
        status: PostStatus,
        facebook_post_ids: &[String],
        error: Option<&str>,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE posts
            SET status = $2,
                facebook_post_ids = $3,
                last_error = $4,
                published_at = CASE WHEN $2 = 'published'::post_status THEN now() ELSE published_at END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(facebook_post_ids)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_recent_for_author(
        author_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BasePostStore for PgPostStore {
    async fn insert(&self, post: &Post) -> Result<()> {
        post.insert(&self.pool).await
    }

    async fn record_outcome(
        &self,
        id: PostId,
        status: PostStatus,
        facebook_post_ids: &[String],
        error: Option<&str>,
    ) -> Result<()> {
        Post::update_outcome(id, status, facebook_post_ids, error, &self.pool).await
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Post>> {
        Post::find_recent_for_author(user_id, limit, &self.pool).await
    }
}
