//! Multi-Page distribution: partial success, first-failure reporting, and
//! validation that happens before any Graph call.

mod common;

use pagecast_core::common::{ErrorKind, UserId};
use pagecast_core::domains::publishing::media::MAX_VIDEO_BYTES;
use pagecast_core::domains::publishing::{
    distribute_post, Distribution, MediaFile, MediaItem, NoopObserver, PublishError,
};
use pagecast_core::kernel::test_dependencies::{
    GraphCall, MemoryPageCredentialStore, MockFacebookGraph,
};

fn pages(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

async fn distribute(
    user_id: UserId,
    page_ids: &[String],
    media: &[MediaItem],
    credentials: &MemoryPageCredentialStore,
    graph: &MockFacebookGraph,
) -> Result<Vec<String>, PublishError> {
    distribute_post(
        Distribution {
            user_id,
            page_ids,
            content: Some("Pantry open Saturday 10-2"),
            media,
        },
        credentials,
        graph,
        &NoopObserver,
    )
    .await
}

#[tokio::test]
async fn one_valid_credential_out_of_three_yields_one_post() {
    let user = UserId::new();
    let credentials = MemoryPageCredentialStore::new()
        .with_credential(user, "Food Shelf", "111", "good-token")
        .with_credential(user, "Clothing Closet", "222", "revoked-token")
        .with_credential(user, "Tool Library", "333", "other-revoked-token");
    // Only the first token is known to the Graph API
    let graph = MockFacebookGraph::new().with_page_token("good-token", "111");

    let ids = distribute(user, &pages(&["111", "222", "333"]), &[], &credentials, &graph)
        .await
        .expect("partial success is not an error");

    assert_eq!(ids.len(), 1);
    assert!(ids[0].starts_with("111_"));
    assert_eq!(graph.published_count(), 1);
}

#[tokio::test]
async fn all_pages_failing_returns_first_failure_in_page_order() {
    let user = UserId::new();
    let credentials = MemoryPageCredentialStore::new()
        .with_credential(user, "Food Shelf", "111", "tok-111")
        .with_credential(user, "Clothing Closet", "222", "tok-222");
    let graph = MockFacebookGraph::new()
        .with_page_token("tok-111", "111")
        .with_page_token("tok-222", "222")
        .failing_page("111", 368, "Temporarily blocked")
        .failing_page("222", 200, "Requires pages_manage_posts");

    let forward = distribute(user, &pages(&["111", "222"]), &[], &credentials, &graph)
        .await
        .unwrap_err();
    assert_eq!(forward.kind(), ErrorKind::RateLimited);

    let reversed = distribute(user, &pages(&["222", "111"]), &[], &credentials, &graph)
        .await
        .unwrap_err();
    assert_eq!(reversed.kind(), ErrorKind::NotPageAdmin);
}

#[tokio::test]
async fn unknown_page_id_fails_without_touching_other_pages() {
    let user = UserId::new();
    let credentials =
        MemoryPageCredentialStore::new().with_credential(user, "Food Shelf", "111", "tok-111");
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");

    let ids = distribute(user, &pages(&["999", "111"]), &[], &credentials, &graph)
        .await
        .unwrap();
    assert_eq!(ids.len(), 1);

    let err = distribute(user, &pages(&["999"]), &[], &credentials, &graph)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PageNotFound);
}

#[tokio::test]
async fn oversized_image_is_rejected_before_any_graph_call() {
    let user = UserId::new();
    let credentials =
        MemoryPageCredentialStore::new().with_credential(user, "Food Shelf", "111", "tok-111");
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");
    let media = vec![MediaItem::File(MediaFile {
        file_name: "flyer.png".into(),
        mime_type: "image/png".into(),
        bytes: vec![0; 5 * 1024 * 1024],
    })];

    let err = distribute(user, &pages(&["111"]), &media, &credentials, &graph)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ImageTooLarge);
    assert!(graph.calls().is_empty());
}

#[tokio::test]
async fn video_among_several_items_is_rejected_before_any_graph_call() {
    let user = UserId::new();
    let credentials =
        MemoryPageCredentialStore::new().with_credential(user, "Food Shelf", "111", "tok-111");
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");
    let media = vec![
        MediaItem::Url("https://cdn.example.org/pantry.jpg".into()),
        MediaItem::File(MediaFile {
            file_name: "tour.mp4".into(),
            mime_type: "video/mp4".into(),
            bytes: vec![0; 1024],
        }),
    ];

    let err = distribute(user, &pages(&["111"]), &media, &credentials, &graph)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::MultipleVideos));
    assert!(graph.calls().is_empty());
}

#[tokio::test]
async fn url_image_is_uploaded_once_per_page() {
    let user = UserId::new();
    let credentials = MemoryPageCredentialStore::new()
        .with_credential(user, "Food Shelf", "111", "tok-111")
        .with_credential(user, "Clothing Closet", "222", "tok-222");
    let graph = MockFacebookGraph::new()
        .with_page_token("tok-111", "111")
        .with_page_token("tok-222", "222");
    let media = vec![MediaItem::Url("https://cdn.example.org/pantry.jpg".into())];

    let ids = distribute(user, &pages(&["111", "222"]), &media, &credentials, &graph)
        .await
        .unwrap();
    assert_eq!(ids.len(), 2);

    let uploads: Vec<String> = graph
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            GraphCall::UploadPhotoUrl { page_id, .. } => Some(page_id),
            _ => None,
        })
        .collect();
    assert_eq!(uploads.len(), 2);
    assert!(uploads.contains(&"111".to_string()));
    assert!(uploads.contains(&"222".to_string()));
}

#[tokio::test]
async fn no_target_pages_fails_before_any_graph_call() {
    let user = UserId::new();
    let credentials =
        MemoryPageCredentialStore::new().with_credential(user, "Food Shelf", "111", "tok-111");
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");

    let err = distribute(user, &[], &[], &credentials, &graph)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::NoPagesSelected));
    assert_eq!(err.kind(), ErrorKind::NoPagesSelected);
    assert!(graph.calls().is_empty());
}

#[tokio::test]
async fn user_without_stored_pages_fails_before_any_graph_call() {
    let user = UserId::new();
    // Credentials exist, but for somebody else
    let credentials = MemoryPageCredentialStore::new().with_credential(
        UserId::new(),
        "Food Shelf",
        "111",
        "tok-111",
    );
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");

    let err = distribute(user, &pages(&["111"]), &[], &credentials, &graph)
        .await
        .unwrap_err();

    assert!(matches!(err, PublishError::NoPageCredentials));
    assert_eq!(err.kind(), ErrorKind::NoPageCredentials);
    assert!(graph.calls().is_empty());
}

#[tokio::test]
async fn oversized_video_is_rejected_before_any_graph_call() {
    let user = UserId::new();
    let credentials =
        MemoryPageCredentialStore::new().with_credential(user, "Food Shelf", "111", "tok-111");
    let graph = MockFacebookGraph::new().with_page_token("tok-111", "111");
    let media = vec![MediaItem::File(MediaFile {
        file_name: "tour.mp4".into(),
        mime_type: "video/mp4".into(),
        bytes: vec![0; MAX_VIDEO_BYTES + 1],
    })];

    let err = distribute(user, &pages(&["111"]), &media, &credentials, &graph)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::VideoTooLarge);
    assert!(graph.calls().is_empty());
}
