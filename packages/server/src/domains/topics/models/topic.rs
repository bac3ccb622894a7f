use anyhow::Result;
use apify_client::SearchHit;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{TopicId, TopicSearchId};

/// A Facebook post found by a topic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Topic {
    pub id: TopicId,
    pub search_id: TopicSearchId,
    pub url: Option<String>,
    pub text: Option<String>,
    pub author_name: Option<String>,
    /// As reported by the actor; formats vary.
    pub posted_at: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
    pub raw: serde_json::Value,
}

impl Topic {
    pub fn from_hit(search_id: TopicSearchId, hit: SearchHit) -> Self {
        let item = hit.item;
        Self {
            id: TopicId::new(),
            search_id,
            url: item.url,
            text: item.text,
            author_name: item.author_name,
            posted_at: item.time,
            likes: item.likes,
            comments: item.comments,
            shares: item.shares,
            raw: hit.raw,
        }
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl Topic {
    pub async fn insert(&self, tx: &mut Transaction<'_, Postgres>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO topics (id, search_id, url, text, author_name, posted_at,
                                likes, comments, shares, raw)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(self.id)
        .bind(self.search_id)
        .bind(&self.url)
        .bind(&self.text)
        .bind(&self.author_name)
        .bind(&self.posted_at)
        .bind(self.likes)
        .bind(self.comments)
        .bind(self.shares)
        .bind(&self.raw)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_for_search(search_id: TopicSearchId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM topics WHERE search_id = $1 ORDER BY id")
            .bind(search_id)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apify_client::FacebookSearchItem;

    #[test]
    fn test_from_hit_keeps_raw_item() {
        let raw = serde_json::json!({ "postUrl": "https://facebook.com/1", "likes": 3, "extra": true });
        let hit = SearchHit {
            item: FacebookSearchItem {
                url: Some("https://facebook.com/1".into()),
                likes: Some(3),
                ..Default::default()
            },
            raw: raw.clone(),
        };
        let search_id = TopicSearchId::new();

        let topic = Topic::from_hit(search_id, hit);
        assert_eq!(topic.search_id, search_id);
        assert_eq!(topic.url.as_deref(), Some("https://facebook.com/1"));
        assert_eq!(topic.likes, Some(3));
        assert_eq!(topic.raw, raw);
    }
}
