//! Topics domain - Facebook content discovery via Apify.

pub mod actions;
pub mod models;

pub use actions::{
    fetch_topics, get_search, search_topics, validate_search, TopicError, TopicSearchResult,
    DEFAULT_MAX_POSTS, MAX_POSTS_LIMIT,
};
pub use models::{Topic, TopicSearch};
