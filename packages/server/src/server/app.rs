//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::*;

/// Request bodies carrying base64 media (posts, video proxy).
pub const UPLOAD_BODY_LIMIT: usize = 100 * 1024 * 1024;

/// Video uploads can take minutes on Facebook's side.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router
///
/// Every `/api` route except login requires an `AuthUser`; handlers reject
/// anonymous requests through the extractor, so the middleware itself never
/// short-circuits.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let jwt_service = deps.jwt_service.clone();
    let sessions = deps.sessions.clone();

    let app_state = AppState { deps };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Routes that accept base64 media payloads
    let uploads = Router::new()
        .route("/api/posts", post(create_post_handler).get(list_posts_handler))
        .route("/api/facebook/upload-video", post(upload_video_handler))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(TimeoutLayer::new(UPLOAD_TIMEOUT));

    Router::new()
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        // Page credentials
        .route("/api/pages", get(list_pages_handler).post(create_page_handler))
        .route("/api/pages/:id", delete(delete_page_handler))
        // Posts
        .route("/api/posts/scheduled", get(list_scheduled_handler))
        // Comments
        .route(
            "/api/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route("/api/comments/:id/used", post(mark_comment_used_handler))
        .route("/api/comments/:id", delete(delete_comment_handler))
        // Topics
        .route("/api/topics/search", post(search_topics_handler))
        .route("/api/topics/searches", get(list_searches_handler))
        .route("/api/topics/searches/:id", get(get_search_handler))
        // Proxies
        .route("/api/apify", post(apify_proxy_handler))
        .merge(uploads)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), sessions.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured (development).
fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    }
}
