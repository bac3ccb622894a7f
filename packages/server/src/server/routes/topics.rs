use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::common::TopicSearchId;
use crate::domains::topics::{self, TopicSearch, TopicSearchResult};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSearchRequest {
    pub query: String,
    #[serde(default, alias = "max_posts")]
    pub max_posts: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchListQuery {
    pub limit: Option<i64>,
}

pub async fn search_topics_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<TopicSearchRequest>,
) -> ApiResult<Json<TopicSearchResult>> {
    let result = topics::search_topics(
        user.user_id,
        &body.query,
        body.max_posts,
        state.deps.topic_scraper.as_ref(),
        &state.deps.db_pool,
    )
    .await?;
    Ok(Json(result))
}

pub async fn list_searches_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Query(query): Query<SearchListQuery>,
) -> ApiResult<Json<Vec<TopicSearch>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let searches = TopicSearch::find_for_user(user.user_id, limit, &state.deps.db_pool).await?;
    Ok(Json(searches))
}

pub async fn get_search_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<TopicSearchId>,
) -> ApiResult<Json<TopicSearchResult>> {
    topics::get_search(user.user_id, id, &state.deps.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Topic search not found"))
}
