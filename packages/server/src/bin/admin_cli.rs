//! Operator CLI: provision dashboard admins and inspect the post schedule.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pagecast_core::domains::auth::models::{normalize_email, AdminUser, ADMIN_ROLE};
use pagecast_core::domains::posts::{JsonFileScheduleStore, ScheduleQueue};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "admin_cli")]
#[command(about = "Pagecast operator commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a dashboard user (needs DATABASE_URL)
    CreateAdmin {
        #[arg(long)]
        email: String,
        /// Falls back to ADMIN_PASSWORD so it stays out of shell history
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = ADMIN_ROLE)]
        role: String,
    },

    /// Print pending scheduled posts as JSON
    Scheduled {
        #[arg(long, env = "SCHEDULED_POSTS_PATH", default_value = "data/scheduled_posts.json")]
        path: PathBuf,
    },

    /// Drop every entry from the schedule file
    ClearSchedule {
        #[arg(long, env = "SCHEDULED_POSTS_PATH", default_value = "data/scheduled_posts.json")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            email,
            password,
            role,
        } => create_admin(&email, &password, &role).await,
        Commands::Scheduled { path } => {
            let queue = schedule_queue(path);
            let pending = queue.pending().await?;
            println!("{}", serde_json::to_string_pretty(&pending)?);
            Ok(())
        }
        Commands::ClearSchedule { path } => {
            schedule_queue(path).clear().await?;
            println!("✓ Schedule cleared");
            Ok(())
        }
    }
}

async fn create_admin(email: &str, password: &str, role: &str) -> Result<()> {
    let email = normalize_email(email);
    if email.is_empty() {
        bail!("--email must not be empty");
    }
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    if AdminUser::find_by_email(&email, &pool).await?.is_some() {
        bail!("A user with email {} already exists", email);
    }

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;
    let user = AdminUser::create(&email, &hash, role.trim(), &pool).await?;
    println!("✓ Created {} ({}) with role {}", user.email, user.id, user.role);
    Ok(())
}

fn schedule_queue(path: PathBuf) -> ScheduleQueue {
    ScheduleQueue::new(Arc::new(JsonFileScheduleStore::new(path)))
}
