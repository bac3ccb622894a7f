//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API. Actors are run with the
//! synchronous `run-sync-get-dataset-items` endpoint, which blocks until the
//! run finishes and returns the dataset in the response body.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::ApifyClient;
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! let hits = client
//!     .search_facebook_posts("apify~facebook-search-scraper", "flood relief", 20)
//!     .await?;
//! for hit in &hits {
//!     println!("{}", hit.item.text.as_deref().unwrap_or("(no text)"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{FacebookSearchInput, FacebookSearchItem, SearchHit};

use serde::de::DeserializeOwned;
use serde::Serialize;

const BASE_URL: &str = "https://api.apify.com/v2";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, BASE_URL.to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url,
        }
    }

    /// Run an actor to completion and return its dataset items.
    ///
    /// `actor_id` is either an actor ID or `username~actor-name`.
    pub async fn run_sync_get_dataset_items<I, T>(&self, actor_id: &str, input: &I) -> Result<Vec<T>>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/acts/{}/run-sync-get-dataset-items",
            self.base_url, actor_id
        );
        tracing::debug!(actor_id, "Running Apify actor synchronously");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Search Facebook posts with a search actor.
    pub async fn search_facebook_posts(
        &self,
        actor_id: &str,
        query: &str,
        max_posts: u32,
    ) -> Result<Vec<SearchHit>> {
        tracing::info!(actor_id, query, max_posts, "Starting Facebook search");

        let input = FacebookSearchInput {
            search_queries: vec![query.to_string()],
            max_posts,
        };
        let raw: Vec<serde_json::Value> = self.run_sync_get_dataset_items(actor_id, &input).await?;

        let hits: Vec<SearchHit> = raw.into_iter().map(to_hit).collect();
        tracing::info!(count = hits.len(), "Fetched Facebook search results");

        Ok(hits)
    }
}

/// Items that do not match the expected shape are kept with empty fields.
fn to_hit(raw: serde_json::Value) -> SearchHit {
    let item = serde_json::from_value::<FacebookSearchItem>(raw.clone()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Dataset item did not match FacebookSearchItem");
        FacebookSearchItem::default()
    });
    SearchHit { item, raw }
}
