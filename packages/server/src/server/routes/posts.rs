use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domains::posts::{create_post, NewPost, Post, PostOutcome, ScheduledPostRecord};
use crate::domains::publishing::{MediaInput, PublishError};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::AuthUser;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub page_ids: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaInput>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Publish now, or schedule when `scheduled_at` is set.
pub async fn create_post_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostOutcome>)> {
    let media = body
        .media
        .into_iter()
        .map(MediaInput::into_item)
        .collect::<Result<Vec<_>, PublishError>>()?;

    let input = NewPost {
        author_id: user.user_id,
        page_ids: body.page_ids,
        content: body.content,
        media,
        scheduled_at: body.scheduled_at,
    };

    let outcome = create_post(input, &state.deps).await?;
    let status = match outcome {
        PostOutcome::Published { .. } => StatusCode::OK,
        PostOutcome::Scheduled { .. } => StatusCode::ACCEPTED,
    };
    Ok((status, Json(outcome)))
}

pub async fn list_posts_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let posts = state.deps.posts.list_for_user(user.user_id, limit).await?;
    Ok(Json(posts))
}

/// Pending scheduled posts, soonest first.
pub async fn list_scheduled_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ScheduledPostRecord>>> {
    let pending = state
        .deps
        .schedule
        .pending()
        .await?
        .into_iter()
        .filter(|record| record.author_id == user.user_id)
        .collect();
    Ok(Json(pending))
}
