use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommentId, UserId};

/// A comment written ahead of time for an admin to paste under a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostComment {
    pub id: CommentId,
    pub user_id: UserId,
    /// Facebook post URL or id.
    pub target: String,
    pub content: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPostComment {
    pub target: String,
    pub content: String,
}

impl NewPostComment {
    pub fn normalized(self) -> Result<Self> {
        let target = self.target.trim().to_string();
        let content = self.content.trim().to_string();
        if target.is_empty() {
            bail!("Comment target is required");
        }
        if content.is_empty() {
            bail!("Comment content is required");
        }
        Ok(Self { target, content })
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl PostComment {
    pub async fn create(user_id: UserId, input: &NewPostComment, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO post_comments (id, user_id, target, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(CommentId::new())
        .bind(user_id)
        .bind(&input.target)
        .bind(&input.content)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user(
        user_id: UserId,
        only_unused: bool,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM post_comments
            WHERE user_id = $1 AND (NOT $2 OR used = false)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(only_unused)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns `None` when the comment does not exist or belongs to someone else.
    pub async fn mark_used(
        user_id: UserId,
        id: CommentId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE post_comments
            SET used = true, used_at = COALESCE(used_at, now())
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(user_id: UserId, id: CommentId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
