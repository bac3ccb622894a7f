//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by every
//! domain action and HTTP handler. All external services use trait
//! abstractions so tests can swap in the mocks from `test_dependencies`.

use anyhow::Result;
use apify_client::{ApifyClient, SearchHit};
use async_trait::async_trait;
use facebook_graph::{DebugTokenData, FacebookClient, UploadFile};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::domains::posts::ScheduleQueue;
use crate::kernel::{
    BaseAdminUserStore, BaseFacebookGraph, BasePageCredentialStore, BasePostStore,
    BaseSessionStore, BaseTopicScraper,
};

// =============================================================================
// FacebookClient Adapter (implements BaseFacebookGraph trait)
// =============================================================================

/// Wrapper around FacebookClient that implements BaseFacebookGraph trait
pub struct FacebookAdapter(pub Arc<FacebookClient>);

impl FacebookAdapter {
    pub fn new(client: Arc<FacebookClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseFacebookGraph for FacebookAdapter {
    async fn debug_token(&self, token: &str) -> facebook_graph::Result<DebugTokenData> {
        self.0.debug_token(token).await
    }

    async fn page_access_token(
        &self,
        page_id: &str,
        user_token: &str,
    ) -> facebook_graph::Result<String> {
        self.0.page_access_token(page_id, user_token).await
    }

    async fn upload_photo_url(
        &self,
        page_id: &str,
        page_token: &str,
        image_url: &str,
    ) -> facebook_graph::Result<String> {
        self.0.upload_photo_url(page_id, page_token, image_url).await
    }

    async fn upload_photo_file(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
    ) -> facebook_graph::Result<String> {
        self.0.upload_photo_file(page_id, page_token, file).await
    }

    async fn upload_video(
        &self,
        page_id: &str,
        page_token: &str,
        file: &UploadFile,
        description: Option<&str>,
    ) -> facebook_graph::Result<String> {
        self.0
            .upload_video(page_id, page_token, file, description)
            .await
    }

    async fn publish_feed(
        &self,
        page_id: &str,
        page_token: &str,
        message: Option<&str>,
        media_ids: &[String],
    ) -> facebook_graph::Result<String> {
        self.0
            .publish_feed(page_id, page_token, message, media_ids)
            .await
    }
}

// =============================================================================
// ApifyClient Adapter (implements BaseTopicScraper trait)
// =============================================================================

/// Wrapper around ApifyClient bound to the topic search actor
pub struct ApifyAdapter {
    client: Arc<ApifyClient>,
    topic_actor_id: String,
}

impl ApifyAdapter {
    pub fn new(client: Arc<ApifyClient>, topic_actor_id: String) -> Self {
        Self {
            client,
            topic_actor_id,
        }
    }
}

#[async_trait]
impl BaseTopicScraper for ApifyAdapter {
    fn topic_actor_id(&self) -> &str {
        &self.topic_actor_id
    }

    async fn search_posts(&self, query: &str, max_posts: u32) -> Result<Vec<SearchHit>> {
        self.client
            .search_facebook_posts(&self.topic_actor_id, query, max_posts)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn run_actor(
        &self,
        actor_id: &str,
        input: &serde_json::Value,
    ) -> Result<Vec<serde_json::Value>> {
        self.client
            .run_sync_get_dataset_items(actor_id, input)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions and handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub facebook: Arc<dyn BaseFacebookGraph>,
    /// Apify actor runner; also backs the `/api/apify` proxy
    pub topic_scraper: Arc<dyn BaseTopicScraper>,
    pub page_credentials: Arc<dyn BasePageCredentialStore>,
    pub posts: Arc<dyn BasePostStore>,
    pub admin_users: Arc<dyn BaseAdminUserStore>,
    pub sessions: Arc<dyn BaseSessionStore>,
    /// Pending scheduled posts
    pub schedule: Arc<ScheduleQueue>,
    /// JWT service for token creation
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: PgPool,
        facebook: Arc<dyn BaseFacebookGraph>,
        topic_scraper: Arc<dyn BaseTopicScraper>,
        page_credentials: Arc<dyn BasePageCredentialStore>,
        posts: Arc<dyn BasePostStore>,
        admin_users: Arc<dyn BaseAdminUserStore>,
        sessions: Arc<dyn BaseSessionStore>,
        schedule: Arc<ScheduleQueue>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            facebook,
            topic_scraper,
            page_credentials,
            posts,
            admin_users,
            sessions,
            schedule,
            jwt_service,
        }
    }
}
