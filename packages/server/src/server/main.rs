// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use apify_client::ApifyClient;
use facebook_graph::FacebookClient;
use pagecast_core::domains::auth::{JwtService, MemorySessionStore, PgAdminUserStore};
use pagecast_core::domains::pages::PgPageCredentialStore;
use pagecast_core::domains::posts::{
    JsonFileScheduleStore, PgPostStore, PostScheduler, ScheduleQueue,
};
use pagecast_core::kernel::{start_scheduler, ApifyAdapter, FacebookAdapter, ServerDeps};
use pagecast_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pagecast_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pagecast API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // External services
    let facebook = Arc::new(FacebookAdapter::new(Arc::new(FacebookClient::new(
        &config.facebook_graph_version,
    ))));
    let apify = Arc::new(ApifyAdapter::new(
        Arc::new(ApifyClient::new(config.apify_api_token.clone())),
        config.apify_topic_actor_id.clone(),
    ));

    // Stores
    let page_credentials = Arc::new(PgPageCredentialStore::new(pool.clone()));
    let posts = Arc::new(PgPostStore::new(pool.clone()));
    let sessions = Arc::new(MemorySessionStore::new());
    let schedule = Arc::new(ScheduleQueue::new(Arc::new(JsonFileScheduleStore::new(
        config.scheduled_posts_path.clone(),
    ))));
    tracing::info!(path = %config.scheduled_posts_path.display(), "Schedule store ready");

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let deps = ServerDeps::new(
        pool.clone(),
        facebook.clone(),
        apify,
        page_credentials.clone(),
        posts.clone(),
        Arc::new(PgAdminUserStore::new(pool.clone())),
        sessions.clone(),
        schedule.clone(),
        jwt_service,
    );

    // Background jobs
    let post_scheduler = Arc::new(PostScheduler::new(
        schedule,
        page_credentials,
        facebook,
        posts,
    ));
    let _scheduler = start_scheduler(post_scheduler, sessions, config.scheduler_interval_secs)
        .await
        .context("Failed to start scheduled tasks")?;

    // Build application
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
