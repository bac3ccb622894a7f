use futures::future::try_join_all;

use super::errors::PublishError;
use super::media::{upload_media, validate_media_item, MediaItem, UploadObserver, UploadedMedia};
use crate::kernel::BaseFacebookGraph;

/// Publish one post to one Page and return the Facebook post id.
///
/// - no media: plain feed post
/// - one image (file or URL): upload unpublished, then attach to a feed post
/// - one video: the upload publishes the post
/// - several items: upload all concurrently, then attach them all; videos
///   are rejected before anything is uploaded
pub async fn publish_to_page(
    graph: &dyn BaseFacebookGraph,
    page_id: &str,
    page_token: &str,
    message: Option<&str>,
    media: &[MediaItem],
    observer: &dyn UploadObserver,
) -> Result<String, PublishError> {
    let message = message.map(str::trim).filter(|m| !m.is_empty());

    match media {
        [] => {
            if message.is_none() {
                return Err(PublishError::EmptyPost);
            }
            Ok(graph.publish_feed(page_id, page_token, message, &[]).await?)
        }
        [single] => {
            match upload_media(graph, page_id, page_token, single, message, observer).await? {
                UploadedMedia::VideoPost(post_id) => Ok(post_id),
                UploadedMedia::Handle(media_id) => Ok(graph
                    .publish_feed(page_id, page_token, message, &[media_id])
                    .await?),
            }
        }
        many => {
            // Fail on any bad item before the first upload starts.
            validate_media_set(many)?;

            let uploads = many
                .iter()
                .map(|item| upload_media(graph, page_id, page_token, item, None, observer));
            let uploaded = try_join_all(uploads).await?;

            let media_ids: Vec<String> = uploaded
                .into_iter()
                .filter_map(|u| match u {
                    UploadedMedia::Handle(id) => Some(id),
                    UploadedMedia::VideoPost(_) => None,
                })
                .collect();

            Ok(graph
                .publish_feed(page_id, page_token, message, &media_ids)
                .await?)
        }
    }
}

/// Check every attachment without touching the network.
///
/// A video can only be the single item of a post.
pub fn validate_media_set(media: &[MediaItem]) -> Result<(), PublishError> {
    if media.len() > 1 && media.iter().any(MediaItem::is_video_file) {
        return Err(PublishError::MultipleVideos);
    }
    for item in media {
        validate_media_item(item)?;
    }
    Ok(())
}
