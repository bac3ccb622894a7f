use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use crate::common::PageCredentialId;
use crate::domains::pages::{NewPageCredential, PageCredential};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

pub async fn list_pages_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<PageCredential>>> {
    let pages = state.deps.page_credentials.list_for_user(user.user_id).await?;
    Ok(Json(pages))
}

pub async fn create_page_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<NewPageCredential>,
) -> ApiResult<(StatusCode, Json<PageCredential>)> {
    let input = body
        .normalized()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let page = state
        .deps
        .page_credentials
        .create(user.user_id, input)
        .await?;
    tracing::info!(user_id = %user.user_id, page_id = %page.page_id, "Page credential added");

    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn delete_page_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<PageCredentialId>,
) -> ApiResult<StatusCode> {
    if state.deps.page_credentials.delete(user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Page credential not found"))
    }
}
