//! HTTP API tests against the in-process router with mocked dependencies.

mod common;

use axum::http::{Method, StatusCode};
use base64::Engine;
use chrono::Utc;
use common::{hash_password, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use pagecast_core::kernel::test_dependencies::{
    MemoryAdminUserStore, MockFacebookGraph, MockTopicScraper,
};
use pagecast_core::kernel::TestDependencies;
use serde_json::json;

fn admin_deps() -> TestDependencies {
    TestDependencies::new().mock_admin_users(
        MemoryAdminUserStore::new()
            .with_user(ADMIN_EMAIL, &hash_password(ADMIN_PASSWORD), "admin")
            .with_user("editor@foodshelf.org", &hash_password(ADMIN_PASSWORD), "editor"),
    )
}

fn publishing_deps() -> TestDependencies {
    admin_deps().mock_graph(
        MockFacebookGraph::new()
            .with_page_token("tok-111", "111")
            .with_page_token("tok-222", "222"),
    )
}

async fn add_page(app: &TestApp, token: &str, name: &str, page_id: &str, access_token: &str) {
    let (status, body) = app
        .post(
            "/api/pages",
            Some(token),
            json!({ "name": name, "page_id": page_id, "access_token": access_token }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = TestApp::new(admin_deps());

    let (status, body) = app.get("/api/pages", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "UNAUTHENTICATED");

    let (status, _) = app.get("/api/posts", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_token_and_user_without_hash() {
    let app = TestApp::new(admin_deps());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "  Admin@FoodShelf.org ", "password": ADMIN_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], ADMIN_EMAIL);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_rejects_non_admin_role() {
    let app = TestApp::new(admin_deps());

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "editor@foodshelf.org", "password": ADMIN_PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "UNAUTHORIZED_ROLE");
}

#[tokio::test]
async fn five_wrong_passwords_lock_the_account() {
    let app = TestApp::new(admin_deps());
    let wrong = json!({ "email": ADMIN_EMAIL, "password": "guess" });

    for _ in 0..4 {
        let (status, body) = app.post("/api/auth/login", None, wrong.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["kind"], "INVALID_PASSWORD");
    }

    let (status, body) = app.post("/api/auth/login", None, wrong).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["kind"], "ACCOUNT_LOCKED");

    // The right password does not help while locked
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["kind"], "ACCOUNT_LOCKED");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new(admin_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = app.get("/api/pages", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get("/api/pages", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Page credentials
// ============================================================================

#[tokio::test]
async fn page_credentials_are_created_listed_and_deleted() {
    let app = TestApp::new(admin_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    add_page(&app, &token, " Food Shelf ", "111", "tok-111").await;

    let (status, pages) = app.get("/api/pages", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pages.as_array().unwrap().len(), 1);
    assert_eq!(pages[0]["name"], "Food Shelf");
    assert_eq!(pages[0]["page_id"], "111");
    assert_eq!(pages[0]["access_token"], "tok-111");

    let id = pages[0]["id"].as_str().unwrap();
    let path = format!("/api/pages/{}", id);
    let (status, _) = app.request(Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.request(Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn page_credential_requires_every_field() {
    let app = TestApp::new(admin_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = app
        .post(
            "/api/pages",
            Some(&token),
            json!({ "name": "Food Shelf", "page_id": "111", "access_token": "  " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "VALIDATION");
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn immediate_post_reports_counts_and_lands_in_history() {
    let app = TestApp::new(publishing_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    add_page(&app, &token, "Food Shelf", "111", "tok-111").await;
    add_page(&app, &token, "Clothing Closet", "222", "revoked").await;

    let (status, body) = app
        .post(
            "/api/posts",
            Some(&token),
            json!({ "content": "Pantry open Saturday", "page_ids": ["111", "222"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["outcome"], "published");
    assert_eq!(body["requested"], 2);
    assert_eq!(body["published"], 1);
    assert_eq!(body["post"]["status"], "published");

    let (_, history) = app.get("/api/posts", Some(&token)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn post_without_pages_is_rejected() {
    let app = TestApp::new(publishing_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = app
        .post(
            "/api/posts",
            Some(&token),
            json!({ "content": "Hello", "page_ids": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "NO_PAGES_SELECTED");
}

#[tokio::test]
async fn scheduled_post_is_queued_not_published() {
    let deps = publishing_deps();
    let graph = deps.graph.clone();
    let app = TestApp::new(deps);
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    add_page(&app, &token, "Food Shelf", "111", "tok-111").await;

    let scheduled_at = (Utc::now() + chrono::Duration::hours(3)).to_rfc3339();
    let (status, body) = app
        .post(
            "/api/posts",
            Some(&token),
            json!({
                "content": "Coat drive tomorrow",
                "page_ids": ["111"],
                "media": [{ "url": "https://cdn.example.org/coats.jpg" }],
                "scheduled_at": scheduled_at,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{}", body);
    assert_eq!(body["outcome"], "scheduled");
    assert_eq!(graph.published_count(), 0);

    let (status, pending) = app.get("/api/posts/scheduled", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["media_urls"][0], "https://cdn.example.org/coats.jpg");
}

#[tokio::test]
async fn scheduled_post_with_file_media_is_rejected() {
    let app = TestApp::new(publishing_deps());
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    add_page(&app, &token, "Food Shelf", "111", "tok-111").await;

    let data = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
    let (status, body) = app
        .post(
            "/api/posts",
            Some(&token),
            json!({
                "content": "Flyer",
                "page_ids": ["111"],
                "media": [{ "file_name": "flyer.png", "mime_type": "image/png", "data_base64": data }],
                "scheduled_at": (Utc::now() + chrono::Duration::hours(1)).to_rfc3339(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "SCHEDULED_MEDIA_REQUIRES_URL");
}

#[tokio::test]
async fn permission_errors_include_remediation() {
    let app = TestApp::new(admin_deps().mock_graph(
        MockFacebookGraph::new()
            .with_page_token("tok-111", "111")
            .failing_page("111", 200, "Requires pages_manage_posts permission"),
    ));
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    add_page(&app, &token, "Food Shelf", "111", "tok-111").await;

    let (status, body) = app
        .post(
            "/api/posts",
            Some(&token),
            json!({ "content": "Hello", "page_ids": ["111"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "NOT_PAGE_ADMIN");
    assert!(!body["error"]["remediation"].as_array().unwrap().is_empty());
}

// ============================================================================
// Proxies
// ============================================================================

#[tokio::test]
async fn apify_proxy_forwards_actor_and_input() {
    let deps = admin_deps().mock_topic_scraper(
        MockTopicScraper::new().with_actor_items(vec![json!({ "url": "https://fb.com/1" })]),
    );
    let scraper = deps.topic_scraper.clone();
    let app = TestApp::new(deps);
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = app
        .post(
            "/api/apify",
            Some(&token),
            json!({ "actorId": "apify~facebook-posts-scraper", "input": { "maxPosts": 5 } }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["url"], "https://fb.com/1");
    let runs = scraper.actor_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].0, "apify~facebook-posts-scraper");
    assert_eq!(runs[0].1["maxPosts"], 5);
}

#[tokio::test]
async fn video_proxy_uploads_and_returns_id() {
    let deps = admin_deps();
    let graph = deps.graph.clone();
    let app = TestApp::new(deps);
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let data = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 2048]);
    let (status, body) = app
        .post(
            "/api/facebook/upload-video",
            Some(&token),
            json!({
                "page_id": "111",
                "access_token": "tok-111",
                "file_name": "tour.mp4",
                "mime_type": "video/mp4",
                "data_base64": data,
                "description": "Warehouse tour",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["id"].as_str().unwrap().starts_with("111_"));
    assert_eq!(graph.published_count(), 1);
}

#[tokio::test]
async fn video_proxy_rejects_images() {
    let deps = admin_deps();
    let graph = deps.graph.clone();
    let app = TestApp::new(deps);
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let data = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
    let (status, body) = app
        .post(
            "/api/facebook/upload-video",
            Some(&token),
            json!({
                "page_id": "111",
                "access_token": "tok-111",
                "file_name": "flyer.png",
                "mime_type": "image/png",
                "data_base64": data,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["kind"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(graph.calls().is_empty());
}
