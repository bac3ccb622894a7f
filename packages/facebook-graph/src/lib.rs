//! Pure Facebook Graph API client.
//!
//! Covers the handful of Page endpoints a publishing dashboard needs: token
//! debugging, Page token lookup, photo and video uploads, and feed posts.
//! Every non-success response goes through [`error::classify_error`] so
//! callers get a typed [`GraphError`] instead of a raw body.
//!
//! # Example
//!
//! ```rust,ignore
//! use facebook_graph::FacebookClient;
//!
//! let client = FacebookClient::new("v22.0");
//! let post_id = client
//!     .publish_feed("1234567890", &page_token, Some("Hello from the dashboard"), &[])
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{classify_error, GraphError, Result};
pub use types::{DebugTokenData, IdResponse, UploadFile};

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use types::{DebugTokenResponse, PageTokenResponse};

const GRAPH_HOST: &str = "https://graph.facebook.com";
const GRAPH_VIDEO_HOST: &str = "https://graph-video.facebook.com";

/// Video uploads can be close to a gigabyte; give them five minutes.
const VIDEO_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub struct FacebookClient {
    client: reqwest::Client,
    video_client: reqwest::Client,
    graph_url: String,
    video_url: String,
}

impl FacebookClient {
    /// Client for the given Graph API version, e.g. `"v22.0"`.
    pub fn new(version: &str) -> Self {
        Self::with_base_urls(
            format!("{}/{}", GRAPH_HOST, version),
            format!("{}/{}", GRAPH_VIDEO_HOST, version),
        )
    }

    /// Client pointed at explicit base URLs (already including the version).
    pub fn with_base_urls(graph_url: String, video_url: String) -> Self {
        let video_client = reqwest::Client::builder()
            .timeout(VIDEO_UPLOAD_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client for video uploads");
                reqwest::Client::new()
            });

        Self {
            client: reqwest::Client::new(),
            video_client,
            graph_url,
            video_url,
        }
    }

    /// Inspect a token. The token authenticates its own debug call.
    pub async fn debug_token(&self, input_token: &str) -> Result<DebugTokenData> {
        let url = format!("{}/debug_token", self.graph_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("input_token", input_token), ("access_token", input_token)])
            .send()
            .await?;

        let body: DebugTokenResponse = handle_response(resp).await?;
        Ok(body.data)
    }

    /// Exchange a user token for the access token of one of that user's Pages.
    pub async fn page_access_token(&self, page_id: &str, user_token: &str) -> Result<String> {
        let url = format!("{}/{}", self.graph_url, page_id);
        let resp = self
            .client
            .get(&url)
            .query(&[("fields", "access_token"), ("access_token", user_token)])
            .send()
            .await?;

        let body: PageTokenResponse = handle_response(resp).await?;
        body.access_token.ok_or_else(|| {
            GraphError::UnexpectedResponse(format!(
                "no access_token returned for page {}",
                body.id
            ))
        })
    }

    /// Upload an unpublished photo from a public URL. Returns the media handle.
    pub async fn upload_photo_url(
        &self,
        page_id: &str,
        page_token: &str,
        image_url: &str,
    ) -> Result<String> {
        let url = format!("{}/{}/photos", self.graph_url, page_id);
        let resp = self
            .client
            .post(&url)
            .form(&[
                ("url", image_url),
                ("published", "false"),
                ("access_token", page_token),
            ])
            .send()
            .await?;

        let body: IdResponse = handle_response(resp).await?;
        tracing::debug!(page_id, media_id = %body.id, "Uploaded photo from URL");
        Ok(body.id)
    }

    /// Upload an unpublished photo from bytes. Returns the media handle.
    pub async fn upload_photo_file(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
    ) -> Result<String> {
        let url = format!("{}/{}/photos", self.graph_url, page_id);
        let form = Form::new()
            .text("published", "false")
            .text("access_token", page_token.to_string())
            .part("source", source_part(file)?);

        let resp = self.client.post(&url).multipart(form).send().await?;

        let body: IdResponse = handle_response(resp).await?;
        tracing::debug!(page_id, media_id = %body.id, file = %file.file_name, "Uploaded photo file");
        Ok(body.id)
    }

    /// Upload a video. Facebook publishes it immediately; the returned id is
    /// the resulting post.
    pub async fn upload_video(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
        description: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/{}/videos", self.video_url, page_id);
        let mut form = Form::new().text("access_token", page_token.to_string());
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }
        let form = form.part("source", source_part(file)?);

        tracing::info!(
            page_id,
            file = %file.file_name,
            bytes = file.bytes.len(),
            "Uploading video"
        );
        let resp = self.video_client.post(&url).multipart(form).send().await?;

        let body: IdResponse = handle_response(resp).await?;
        Ok(body.id)
    }

    /// Create a feed post, optionally attaching previously uploaded media.
    pub async fn publish_feed(
        &self,
        page_id: &str,
        page_token: &str,
        message: Option<&str>,
        media_ids: &[String],
    ) -> Result<String> {
        let url = format!("{}/{}/feed", self.graph_url, page_id);
        let resp = self
            .client
            .post(&url)
            .form(&feed_params(page_token, message, media_ids))
            .send()
            .await?;

        let body: IdResponse = handle_response(resp).await?;
        tracing::info!(page_id, post_id = %body.id, media = media_ids.len(), "Published feed post");
        Ok(body.id)
    }
}

fn source_part(file: &UploadFile) -> Result<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(Into::into)
}

/// Form fields for `POST /{page}/feed`.
fn feed_params(
    page_token: &str,
    message: Option<&str>,
    media_ids: &[String],
) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(media_ids.len() + 2);
    if let Some(message) = message {
        params.push(("message".to_string(), message.to_string()));
    }
    for (i, media_id) in media_ids.iter().enumerate() {
        params.push((
            format!("attached_media[{}]", i),
            serde_json::json!({ "media_fbid": media_id }).to_string(),
        ));
    }
    params.push(("access_token".to_string(), page_token.to_string()));
    params
}

/// Single funnel for every Graph response: decode on success, classify otherwise.
async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let err = classify_error(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "Graph API call failed");
        return Err(err);
    }

    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| GraphError::UnexpectedResponse(format!("{e}: {text}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_params_attach_media_in_order() {
        let ids = vec!["111".to_string(), "222".to_string()];
        let params = feed_params("tok", Some("hello"), &ids);

        assert_eq!(params[0], ("message".to_string(), "hello".to_string()));
        assert_eq!(params[1].0, "attached_media[0]");
        assert_eq!(params[1].1, r#"{"media_fbid":"111"}"#);
        assert_eq!(params[2].0, "attached_media[1]");
        assert_eq!(params[2].1, r#"{"media_fbid":"222"}"#);
        assert_eq!(params[3], ("access_token".to_string(), "tok".to_string()));
    }

    #[test]
    fn test_feed_params_without_message() {
        let params = feed_params("tok", None, &["9".to_string()]);
        assert!(params.iter().all(|(k, _)| k != "message"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_new_builds_versioned_urls() {
        let client = FacebookClient::new("v22.0");
        assert_eq!(client.graph_url, "https://graph.facebook.com/v22.0");
        assert_eq!(client.video_url, "https://graph-video.facebook.com/v22.0");
    }

    #[test]
    fn test_debug_token_data_parses_page_token() {
        let json = r#"{"data":{"app_id":"42","type":"PAGE","is_valid":true,
            "scopes":["pages_manage_posts"],"expires_at":0,"profile_id":"1234"}}"#;
        let parsed: DebugTokenResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.is_valid);
        assert_eq!(parsed.data.token_type.as_deref(), Some("PAGE"));
        assert_eq!(parsed.data.scopes, vec!["pages_manage_posts"]);
    }
}
