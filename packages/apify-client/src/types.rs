use serde::{Deserialize, Serialize};

/// Input for a Facebook search actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookSearchInput {
    #[serde(rename = "searchQueries")]
    pub search_queries: Vec<String>,
    #[serde(rename = "maxPosts")]
    pub max_posts: u32,
}

/// A single Facebook post from a search actor's dataset.
///
/// Actors disagree on field names, so everything is optional and the raw
/// item is kept by callers that need more.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FacebookSearchItem {
    #[serde(alias = "postUrl", alias = "link")]
    pub url: Option<String>,
    #[serde(alias = "postText", alias = "message")]
    pub text: Option<String>,
    #[serde(rename = "pageName", alias = "authorName")]
    pub author_name: Option<String>,
    /// RFC 3339 when the actor provides one.
    #[serde(alias = "timestamp")]
    pub time: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
}

/// A dataset item decoded into [`FacebookSearchItem`] alongside its raw JSON.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub item: FacebookSearchItem,
    pub raw: serde_json::Value,
}
