//! Postgres round trips for the stored models.
//!
//! These need Docker: `cargo test -p server -- --ignored`.

mod common;

use common::{create_test_admin, TestHarness};
use pagecast_core::domains::auth::models::AdminUser;
use pagecast_core::domains::comments::{NewPostComment, PostComment};
use pagecast_core::domains::pages::{NewPageCredential, PgPageCredentialStore};
use pagecast_core::domains::posts::{PgPostStore, Post, PostStatus};
use pagecast_core::domains::topics::{get_search, search_topics, TopicSearch};
use pagecast_core::kernel::test_dependencies::MockTopicScraper;
use pagecast_core::kernel::{BasePageCredentialStore, BasePostStore};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn page_credential_write_then_list_is_identical(ctx: &mut TestHarness) {
    let admin = create_test_admin(&ctx.db_pool).await.unwrap();
    let store = PgPageCredentialStore::new(ctx.db_pool.clone());

    let created = store
        .create(
            admin.id,
            NewPageCredential {
                name: "Food Shelf".into(),
                page_id: "104857600123".into(),
                access_token: "EAAB-page-token".into(),
            },
        )
        .await
        .unwrap();

    let listed = store.list_for_user(admin.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].name, "Food Shelf");
    assert_eq!(listed[0].page_id, "104857600123");
    assert_eq!(listed[0].access_token, "EAAB-page-token");

    // Another admin cannot delete it
    let other = create_test_admin(&ctx.db_pool).await.unwrap();
    assert!(!store.delete(other.id, created.id).await.unwrap());
    assert!(store.delete(admin.id, created.id).await.unwrap());
    assert!(store.list_for_user(admin.id).await.unwrap().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn admin_lookup_normalises_email(ctx: &mut TestHarness) {
    let admin = create_test_admin(&ctx.db_pool).await.unwrap();

    let found = AdminUser::find_by_email(&format!("  {}  ", admin.email.to_uppercase()), &ctx.db_pool)
        .await
        .unwrap()
        .expect("admin is found");
    assert_eq!(found.id, admin.id);
    assert!(found.is_admin());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn post_outcome_is_recorded(ctx: &mut TestHarness) {
    let admin = create_test_admin(&ctx.db_pool).await.unwrap();
    let store = PgPostStore::new(ctx.db_pool.clone());

    let post = Post::draft(
        admin.id,
        Some("Pantry open Saturday".into()),
        vec!["111".into(), "222".into()],
        vec!["https://cdn.example.org/pantry.jpg".into()],
    );
    store.insert(&post).await.unwrap();
    store
        .record_outcome(post.id, PostStatus::Published, &["111_9".into()], None)
        .await
        .unwrap();

    let history = store.list_for_user(admin.id, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, PostStatus::Published);
    assert_eq!(history[0].facebook_post_ids, vec!["111_9".to_string()]);
    assert_eq!(history[0].page_ids, post.page_ids);
    assert!(history[0].published_at.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn comments_are_marked_used_once(ctx: &mut TestHarness) {
    let admin = create_test_admin(&ctx.db_pool).await.unwrap();
    let input = NewPostComment {
        target: "https://facebook.com/foodshelf/posts/1".into(),
        content: "Thank you to everyone who donated!".into(),
    };
    let comment = PostComment::create(admin.id, &input, &ctx.db_pool).await.unwrap();
    assert!(!comment.used);

    let used = PostComment::mark_used(admin.id, comment.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert!(used.used);
    let first_used_at = used.used_at;

    let again = PostComment::mark_used(admin.id, comment.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.used_at, first_used_at);

    let unused = PostComment::find_for_user(admin.id, true, &ctx.db_pool).await.unwrap();
    assert!(unused.is_empty());
    assert!(PostComment::delete(admin.id, comment.id, &ctx.db_pool).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn topic_search_is_stored_with_its_topics(ctx: &mut TestHarness) {
    let admin = create_test_admin(&ctx.db_pool).await.unwrap();
    let scraper = MockTopicScraper::new().with_posts(&[
        ("https://facebook.com/a/posts/1", "Food drive this weekend"),
        ("https://facebook.com/b/posts/2", "Food shelf volunteers needed"),
    ]);

    let result = search_topics(admin.id, " food drive ", Some(10), &scraper, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(result.search.query, "food drive");
    assert_eq!(result.search.result_count, 2);
    assert_eq!(result.topics.len(), 2);

    let searches = TopicSearch::find_for_user(admin.id, 10, &ctx.db_pool).await.unwrap();
    assert_eq!(searches.len(), 1);

    let fetched = get_search(admin.id, result.search.id, &ctx.db_pool)
        .await
        .unwrap()
        .expect("search exists");
    assert_eq!(fetched.topics, result.topics);
}
