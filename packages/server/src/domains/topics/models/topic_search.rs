use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{TopicSearchId, UserId};

/// One run of the topic search actor.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicSearch {
    pub id: TopicSearchId,
    pub user_id: UserId,
    pub query: String,
    pub actor_id: String,
    pub result_count: i32,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries
// =============================================================================

impl TopicSearch {
    pub async fn create(
        user_id: UserId,
        query: &str,
        actor_id: &str,
        result_count: i32,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO topic_searches (id, user_id, query, actor_id, result_count)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(TopicSearchId::new())
        .bind(user_id)
        .bind(query)
        .bind(actor_id)
        .bind(result_count)
        .fetch_one(&mut **tx)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user(user_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM topic_searches WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user_by_id(
        user_id: UserId,
        id: TopicSearchId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM topic_searches WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
