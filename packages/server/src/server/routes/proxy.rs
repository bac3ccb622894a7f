//! Server-side proxies that keep API tokens and large uploads off the browser.

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::ErrorKind;
use crate::domains::publishing::{
    validate_media_file, MediaInput, MediaItem, MediaKind, PublishError,
};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApifyProxyRequest {
    #[serde(alias = "actor_id")]
    pub actor_id: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

/// Run an Apify actor with the server's token and return its dataset items.
pub async fn apify_proxy_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<ApifyProxyRequest>,
) -> ApiResult<Json<Vec<serde_json::Value>>> {
    let actor_id = body.actor_id.trim();
    if actor_id.is_empty() {
        return Err(ApiError::validation("actor_id is required"));
    }
    let input = if body.input.is_null() {
        serde_json::json!({})
    } else {
        body.input
    };

    tracing::info!(user_id = %user.user_id, actor_id, "Proxying Apify actor run");
    let items = state
        .deps
        .topic_scraper
        .run_actor(actor_id, &input)
        .await
        .map_err(|e| {
            tracing::warn!(actor_id, error = %e, "Apify actor run failed");
            ApiError::new(ErrorKind::Upstream, format!("Apify request failed: {}", e))
        })?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct VideoUploadRequest {
    pub page_id: String,
    pub access_token: String,
    pub file_name: String,
    pub mime_type: String,
    pub data_base64: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoUploadResponse {
    pub id: String,
}

/// Upload a base64 video to a Page with the supplied Page token.
pub async fn upload_video_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(body): Json<VideoUploadRequest>,
) -> ApiResult<Json<VideoUploadResponse>> {
    let page_id = body.page_id.trim().to_string();
    let access_token = body.access_token.trim().to_string();
    if page_id.is_empty() || access_token.is_empty() {
        return Err(ApiError::validation("page_id and access_token are required"));
    }

    let item = MediaInput::File {
        file_name: body.file_name,
        mime_type: body.mime_type,
        data_base64: body.data_base64,
    }
    .into_item()?;
    let MediaItem::File(file) = item else {
        return Err(ApiError::validation("A video file is required"));
    };
    if validate_media_file(&file)? != MediaKind::Video {
        return Err(PublishError::UnsupportedMediaType {
            file_name: file.file_name,
            mime_type: file.mime_type,
        }
        .into());
    }

    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    tracing::info!(
        user_id = %user.user_id,
        page_id = %page_id,
        file_name = %file.file_name,
        bytes = file.bytes.len(),
        "Uploading video"
    );
    let id = state
        .deps
        .facebook
        .upload_video(&page_id, &access_token, &file, description)
        .await
        .map_err(PublishError::from)?;

    Ok(Json(VideoUploadResponse { id }))
}
