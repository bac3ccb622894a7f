use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
    pub apify_api_token: String,
    pub apify_topic_actor_id: String,
    pub facebook_graph_version: String,
    pub scheduled_posts_path: PathBuf,
    pub scheduler_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "pagecast".to_string()),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
            apify_api_token: env::var("APIFY_API_TOKEN").context("APIFY_API_TOKEN must be set")?,
            apify_topic_actor_id: env::var("APIFY_TOPIC_ACTOR_ID")
                .unwrap_or_else(|_| "apify~facebook-search-scraper".to_string()),
            facebook_graph_version: env::var("FACEBOOK_GRAPH_VERSION")
                .unwrap_or_else(|_| "v22.0".to_string()),
            scheduled_posts_path: env::var("SCHEDULED_POSTS_PATH")
                .unwrap_or_else(|_| "data/scheduled_posts.json".to_string())
                .into(),
            scheduler_interval_secs: parse_interval(
                &env::var("SCHEDULER_INTERVAL_SECS").unwrap_or_else(|_| "15".to_string()),
            )?,
        })
    }
}

/// A zero interval would make the repeated job spin.
fn parse_interval(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("SCHEDULER_INTERVAL_SECS must be a valid number")?;
    if secs == 0 {
        bail!("SCHEDULER_INTERVAL_SECS must be at least 1");
    }
    Ok(secs)
}

/// Split a comma-separated env value, dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
