//! Media validation and upload to a Page.
//!
//! Images (by URL or file) become unpublished photos whose ids are attached
//! to a feed post afterwards. Videos are different: the upload itself creates
//! the post, so a video can only ever be the single item of a post.

use facebook_graph::UploadFile;
use serde::Deserialize;

use super::errors::PublishError;
use crate::kernel::BaseFacebookGraph;

pub type MediaFile = UploadFile;

pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 1024 * 1024 * 1024;

pub const IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
pub const VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/quicktime",
    "video/x-ms-wmv",
    "video/x-msvideo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One attachment of a post.
#[derive(Debug, Clone)]
pub enum MediaItem {
    /// Already hosted image.
    Url(String),
    File(MediaFile),
}

impl MediaItem {
    /// Key used for progress and error callbacks.
    pub fn label(&self) -> &str {
        match self {
            MediaItem::Url(url) => url,
            MediaItem::File(file) => &file.file_name,
        }
    }

    pub fn is_video_file(&self) -> bool {
        matches!(self, MediaItem::File(file) if media_kind(&file.mime_type) == Some(MediaKind::Video))
    }
}

/// Result of uploading one media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadedMedia {
    /// Unpublished photo, to be attached to a feed post.
    Handle(String),
    /// Video upload, which already created this post.
    VideoPost(String),
}

/// Receives coarse progress (0, 50, 100) and per-file errors during uploads.
pub trait UploadObserver: Send + Sync {
    fn on_progress(&self, label: &str, percent: u8);
    fn on_error(&self, label: &str, error: &PublishError);
}

pub struct NoopObserver;

impl UploadObserver for NoopObserver {
    fn on_progress(&self, _label: &str, _percent: u8) {}
    fn on_error(&self, _label: &str, _error: &PublishError) {}
}

/// Progress that only goes to the log.
pub struct TracingObserver;

impl UploadObserver for TracingObserver {
    fn on_progress(&self, label: &str, percent: u8) {
        tracing::debug!(media = label, percent, "Upload progress");
    }

    fn on_error(&self, label: &str, error: &PublishError) {
        tracing::warn!(media = label, error = %error, "Upload failed");
    }
}

fn media_kind(mime_type: &str) -> Option<MediaKind> {
    let mime = mime_type.trim().to_ascii_lowercase();
    if IMAGE_MIME_TYPES.contains(&mime.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_MIME_TYPES.contains(&mime.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Check MIME type and size ceiling. Never touches the network.
pub fn validate_media_file(file: &MediaFile) -> Result<MediaKind, PublishError> {
    let kind = media_kind(&file.mime_type).ok_or_else(|| PublishError::UnsupportedMediaType {
        file_name: file.file_name.clone(),
        mime_type: file.mime_type.clone(),
    })?;

    let size = file.bytes.len();
    match kind {
        MediaKind::Image if size > MAX_IMAGE_BYTES => Err(PublishError::ImageTooLarge {
            file_name: file.file_name.clone(),
            size,
            limit: MAX_IMAGE_BYTES,
        }),
        MediaKind::Video if size > MAX_VIDEO_BYTES => Err(PublishError::VideoTooLarge {
            file_name: file.file_name.clone(),
            size,
            limit: MAX_VIDEO_BYTES,
        }),
        _ => Ok(kind),
    }
}

/// Only absolute http(s) URLs can be fetched by Facebook.
pub fn validate_media_url(raw: &str) -> Result<url::Url, PublishError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| PublishError::InvalidUrl(format!("{}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(PublishError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            raw, scheme
        ))),
    }
}

/// Validate without uploading.
pub fn validate_media_item(item: &MediaItem) -> Result<MediaKind, PublishError> {
    match item {
        MediaItem::Url(url) => validate_media_url(url).map(|_| MediaKind::Image),
        MediaItem::File(file) => validate_media_file(file),
    }
}

/// Validate and upload one media item to a Page.
///
/// `description` is only used for videos, where it becomes the post text.
pub async fn upload_media(
    graph: &dyn BaseFacebookGraph,
    page_id: &str,
    page_token: &str,
    item: &MediaItem,
    description: Option<&str>,
    observer: &dyn UploadObserver,
) -> Result<UploadedMedia, PublishError> {
    let label = item.label();
    observer.on_progress(label, 0);

    let result = upload_inner(graph, page_id, page_token, item, description, observer).await;
    match &result {
        Ok(_) => observer.on_progress(label, 100),
        Err(e) => observer.on_error(label, e),
    }
    result
}

async fn upload_inner(
    graph: &dyn BaseFacebookGraph,
    page_id: &str,
    page_token: &str,
    item: &MediaItem,
    description: Option<&str>,
    observer: &dyn UploadObserver,
) -> Result<UploadedMedia, PublishError> {
    let kind = validate_media_item(item)?;
    observer.on_progress(item.label(), 50);

    let uploaded = match (item, kind) {
        (MediaItem::Url(url), _) => {
            UploadedMedia::Handle(graph.upload_photo_url(page_id, page_token, url.trim()).await?)
        }
        (MediaItem::File(file), MediaKind::Image) => {
            UploadedMedia::Handle(graph.upload_photo_file(page_id, page_token, file).await?)
        }
        (MediaItem::File(file), MediaKind::Video) => UploadedMedia::VideoPost(
            graph
                .upload_video(page_id, page_token, file, description)
                .await?,
        ),
    };
    Ok(uploaded)
}

/// Wire form of an attachment in JSON requests: a hosted URL or a base64 file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MediaInput {
    Url {
        url: String,
    },
    File {
        file_name: String,
        mime_type: String,
        data_base64: String,
    },
}

impl MediaInput {
    pub fn into_item(self) -> Result<MediaItem, PublishError> {
        use base64::Engine;

        match self {
            MediaInput::Url { url } => Ok(MediaItem::Url(url)),
            MediaInput::File {
                file_name,
                mime_type,
                data_base64,
            } => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(data_base64.trim())
                    .map_err(|e| PublishError::InvalidMediaData {
                        file_name: file_name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(MediaItem::File(MediaFile {
                    file_name,
                    mime_type,
                    bytes,
                }))
            }
        }
    }
}
