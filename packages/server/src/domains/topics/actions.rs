//! Topic search through the configured Apify actor.

use apify_client::SearchHit;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use super::models::{Topic, TopicSearch};
use crate::common::{ErrorKind, TopicSearchId, UserId};
use crate::kernel::BaseTopicScraper;

pub const DEFAULT_MAX_POSTS: u32 = 20;
pub const MAX_POSTS_LIMIT: u32 = 100;

#[derive(Error, Debug)]
pub enum TopicError {
    #[error("Search query is required")]
    EmptyQuery,

    #[error("max_posts must be between 1 and 100, got {0}")]
    InvalidMaxPosts(u32),

    #[error("Topic search failed: {0}")]
    Scraper(#[source] anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl TopicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopicError::EmptyQuery | TopicError::InvalidMaxPosts(_) => ErrorKind::Validation,
            TopicError::Scraper(_) => ErrorKind::Upstream,
            TopicError::Storage(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicSearchResult {
    pub search: TopicSearch,
    pub topics: Vec<Topic>,
}

/// Trim the query and settle the post limit.
pub fn validate_search(query: &str, max_posts: Option<u32>) -> Result<(String, u32), TopicError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(TopicError::EmptyQuery);
    }
    let max_posts = max_posts.unwrap_or(DEFAULT_MAX_POSTS);
    if !(1..=MAX_POSTS_LIMIT).contains(&max_posts) {
        return Err(TopicError::InvalidMaxPosts(max_posts));
    }
    Ok((query.to_string(), max_posts))
}

/// Run the actor and return at most `max_posts` hits.
pub async fn fetch_topics(
    scraper: &dyn BaseTopicScraper,
    query: &str,
    max_posts: Option<u32>,
) -> Result<Vec<SearchHit>, TopicError> {
    let (query, max_posts) = validate_search(query, max_posts)?;

    let mut hits = scraper
        .search_posts(&query, max_posts)
        .await
        .map_err(TopicError::Scraper)?;
    // Some actors ignore maxPosts.
    hits.truncate(max_posts as usize);

    tracing::info!(query = %query, hits = hits.len(), "Topic search complete");
    Ok(hits)
}

/// Search, then store the search and its topics in one transaction.
pub async fn search_topics(
    user_id: UserId,
    query: &str,
    max_posts: Option<u32>,
    scraper: &dyn BaseTopicScraper,
    pool: &PgPool,
) -> Result<TopicSearchResult, TopicError> {
    let hits = fetch_topics(scraper, query, max_posts).await?;
    let result_count = i32::try_from(hits.len()).map_err(anyhow::Error::from)?;

    let mut tx = pool.begin().await.map_err(anyhow::Error::from)?;
    let search = TopicSearch::create(
        user_id,
        query.trim(),
        scraper.topic_actor_id(),
        result_count,
        &mut tx,
    )
    .await?;

    let mut topics = Vec::with_capacity(hits.len());
    for hit in hits {
        let topic = Topic::from_hit(search.id, hit);
        topic.insert(&mut tx).await?;
        topics.push(topic);
    }
    tx.commit().await.map_err(anyhow::Error::from)?;

    Ok(TopicSearchResult { search, topics })
}

/// A past search with its topics, if it belongs to `user_id`.
pub async fn get_search(
    user_id: UserId,
    id: TopicSearchId,
    pool: &PgPool,
) -> Result<Option<TopicSearchResult>, TopicError> {
    let Some(search) = TopicSearch::find_for_user_by_id(user_id, id, pool).await? else {
        return Ok(None);
    };
    let topics = Topic::find_for_search(search.id, pool).await?;
    Ok(Some(TopicSearchResult { search, topics }))
}
