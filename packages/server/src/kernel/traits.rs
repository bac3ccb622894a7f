// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Publishing, scheduling and login rules live in domain functions that take
// these traits as arguments, so tests can swap in the mocks from
// `test_dependencies`.
//
// Naming convention: Base* for trait names (e.g., BaseFacebookGraph, BaseScheduleStore)

use anyhow::Result;
use apify_client::SearchHit;
use async_trait::async_trait;
use facebook_graph::{DebugTokenData, UploadFile};

use crate::common::{PageCredentialId, PostId, UserId};
use crate::domains::auth::models::{AdminUser, LoginAttempts, Session};
use crate::domains::pages::models::{NewPageCredential, PageCredential};
use crate::domains::posts::models::{Post, PostStatus, ScheduledPostRecord};

// =============================================================================
// Facebook Graph API (Infrastructure - Page publishing)
// =============================================================================

/// Raw Graph API calls. Errors keep Facebook's classification.
#[async_trait]
pub trait BaseFacebookGraph: Send + Sync {
    async fn debug_token(&self, token: &str) -> facebook_graph::Result<DebugTokenData>;

    async fn page_access_token(
        &self,
        page_id: &str,
        user_token: &str,
    ) -> facebook_graph::Result<String>;

    /// Unpublished photo from a hosted URL; returns a media handle.
    async fn upload_photo_url(
        &self,
        page_id: &str,
        page_token: &str,
        image_url: &str,
    ) -> facebook_graph::Result<String>;

    /// Unpublished photo from bytes; returns a media handle.
    async fn upload_photo_file(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
    ) -> facebook_graph::Result<String>;

    /// Video upload; publishes immediately and returns the post id.
    async fn upload_video(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
        description: Option<&str>,
    ) -> facebook_graph::Result<String>;

    async fn publish_feed(
        &self,
        page_id: &str,
        page_token: &str,
        message: Option<&str>,
        media_ids: &[String],
    ) -> facebook_graph::Result<String>;
}

// =============================================================================
// Topic scraping (Infrastructure - Apify)
// =============================================================================

#[async_trait]
pub trait BaseTopicScraper: Send + Sync {
    /// Actor used for topic searches.
    fn topic_actor_id(&self) -> &str;

    /// Search Facebook posts with the configured topic actor.
    async fn search_posts(&self, query: &str, max_posts: u32) -> Result<Vec<SearchHit>>;

    /// Run any actor synchronously and return the raw dataset items.
    async fn run_actor(
        &self,
        actor_id: &str,
        input: &serde_json::Value,
    ) -> Result<Vec<serde_json::Value>>;
}

// =============================================================================
// Stores (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BasePageCredentialStore: Send + Sync {
    async fn create(&self, user_id: UserId, input: NewPageCredential) -> Result<PageCredential>;

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PageCredential>>;

    /// Returns `false` when the credential does not exist or belongs to another user.
    async fn delete(&self, user_id: UserId, id: PageCredentialId) -> Result<bool>;
}

#[async_trait]
pub trait BasePostStore: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<()>;

    async fn record_outcome(
        &self,
        id: PostId,
        status: PostStatus,
        facebook_post_ids: &[String],
        error: Option<&str>,
    ) -> Result<()>;

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Post>>;
}

#[async_trait]
pub trait BaseAdminUserStore: Send + Sync {
    /// Lookup by normalised (trimmed, lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>>;
}

/// Session and login-attempt persistence.
#[async_trait]
pub trait BaseSessionStore: Send + Sync {
    async fn get_session(&self, token: &str) -> Result<Option<Session>>;

    async fn set_session(&self, session: Session) -> Result<()>;

    async fn clear_session(&self, token: &str) -> Result<()>;

    async fn get_attempts(&self, email: &str) -> Result<Option<LoginAttempts>>;

    async fn set_attempts(&self, email: &str, attempts: LoginAttempts) -> Result<()>;

    async fn clear_attempts(&self, email: &str) -> Result<()>;
}

/// Whole-list persistence for pending scheduled posts.
///
/// Implementations are read-modify-write; there is no cross-process locking.
#[async_trait]
pub trait BaseScheduleStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<ScheduledPostRecord>>;

    async fn save_all(&self, records: &[ScheduledPostRecord]) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}
