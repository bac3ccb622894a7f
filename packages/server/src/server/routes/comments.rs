use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::CommentId;
use crate::domains::comments::{NewPostComment, PostComment};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
pub struct CommentQuery {
    #[serde(default)]
    pub unused: bool,
}

pub async fn list_comments_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Query(query): Query<CommentQuery>,
) -> ApiResult<Json<Vec<PostComment>>> {
    let comments =
        PostComment::find_for_user(user.user_id, query.unused, &state.deps.db_pool).await?;
    Ok(Json(comments))
}

pub async fn create_comment_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<NewPostComment>,
) -> ApiResult<(StatusCode, Json<PostComment>)> {
    let input = body
        .normalized()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let comment = PostComment::create(user.user_id, &input, &state.deps.db_pool).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn mark_comment_used_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<CommentId>,
) -> ApiResult<Json<PostComment>> {
    PostComment::mark_used(user.user_id, id, &state.deps.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Comment not found"))
}

pub async fn delete_comment_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<CommentId>,
) -> ApiResult<StatusCode> {
    if PostComment::delete(user.user_id, id, &state.deps.db_pool).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Comment not found"))
    }
}
