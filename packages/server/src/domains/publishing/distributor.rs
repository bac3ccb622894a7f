use futures::future::join_all;

use super::errors::PublishError;
use super::media::{MediaItem, UploadObserver};
use super::publisher::{publish_to_page, validate_media_set};
use super::token_verifier::resolve_page_token;
use crate::common::UserId;
use crate::domains::pages::models::PageCredential;
use crate::kernel::{BaseFacebookGraph, BasePageCredentialStore};

/// A logical post addressed to one or more Pages.
#[derive(Debug, Clone, Copy)]
pub struct Distribution<'a> {
    pub user_id: UserId,
    pub page_ids: &'a [String],
    pub content: Option<&'a str>,
    pub media: &'a [MediaItem],
}

/// Publish a post to every target Page.
///
/// Per-Page failures do not stop the batch. If no Page succeeds the first
/// failure (in `page_ids` order) is returned; otherwise only the successful
/// post ids come back and the failures are logged. Callers compare
/// `ids.len()` with `page_ids.len()` to detect partial success.
pub async fn distribute_post(
    post: Distribution<'_>,
    credentials: &dyn BasePageCredentialStore,
    graph: &dyn BaseFacebookGraph,
    observer: &dyn UploadObserver,
) -> Result<Vec<String>, PublishError> {
    if post.page_ids.is_empty() {
        return Err(PublishError::NoPagesSelected);
    }
    let content = post.content.map(str::trim).filter(|c| !c.is_empty());
    if content.is_none() && post.media.is_empty() {
        return Err(PublishError::EmptyPost);
    }
    validate_media_set(post.media)?;

    let stored = credentials.list_for_user(post.user_id).await?;
    if stored.is_empty() {
        return Err(PublishError::NoPageCredentials);
    }

    let attempts = post.page_ids.iter().map(|page_id| {
        let credential = stored.iter().find(|c| &c.page_id == page_id);
        publish_with_credential(graph, page_id, credential, content, post.media, observer)
    });
    let results = join_all(attempts).await;

    let mut post_ids = Vec::new();
    let mut failures = Vec::new();
    for (page_id, result) in post.page_ids.iter().zip(results) {
        match result {
            Ok(id) => post_ids.push(id),
            Err(e) => failures.push((page_id, e)),
        }
    }

    if post_ids.is_empty() {
        // join_all keeps input order, so this is the first Page's failure.
        let (page_id, first) = failures
            .into_iter()
            .next()
            .ok_or(PublishError::NoPagesSelected)?;
        tracing::warn!(page_id = %page_id, error = %first, "Post failed on every Page");
        return Err(first);
    }

    for (page_id, error) in &failures {
        tracing::warn!(
            page_id = %page_id,
            kind = ?error.kind(),
            error = %error,
            "Post failed on one Page; continuing with the others"
        );
    }
    tracing::info!(
        requested = post.page_ids.len(),
        published = post_ids.len(),
        "Post distributed"
    );

    Ok(post_ids)
}

async fn publish_with_credential(
    graph: &dyn BaseFacebookGraph,
    page_id: &str,
    credential: Option<&PageCredential>,
    content: Option<&str>,
    media: &[MediaItem],
    observer: &dyn UploadObserver,
) -> Result<String, PublishError> {
    let credential = credential.ok_or_else(|| PublishError::PageNotFound(page_id.to_string()))?;
    let page_token = resolve_page_token(graph, page_id, &credential.access_token).await?;
    publish_to_page(graph, page_id, &page_token, content, media, observer).await
}
