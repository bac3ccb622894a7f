//! Test fixtures for creating test data.

use anyhow::Result;
use chrono::{DateTime, Utc};
use pagecast_core::common::{PostId, UserId};
use pagecast_core::domains::auth::models::{AdminUser, ADMIN_ROLE};
use pagecast_core::domains::posts::{PostStatus, ScheduledPostRecord};
use sqlx::PgPool;

pub const ADMIN_EMAIL: &str = "admin@foodshelf.org";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Low bcrypt cost keeps tests fast.
pub fn hash_password(password: &str) -> String {
    bcrypt::hash(password, 4).expect("bcrypt hash")
}

/// Insert an admin with a unique email.
pub async fn create_test_admin(pool: &PgPool) -> Result<AdminUser> {
    let email = format!("admin-{}@foodshelf.org", UserId::new());
    AdminUser::create(&email, &hash_password(ADMIN_PASSWORD), ADMIN_ROLE, pool).await
}

/// A scheduled record that is already due.
pub fn due_record(author_id: UserId, page_ids: &[&str], content: &str) -> ScheduledPostRecord {
    let scheduled_at: DateTime<Utc> = Utc::now() - chrono::Duration::minutes(1);
    ScheduledPostRecord {
        id: PostId::new(),
        author_id,
        content: Some(content.to_string()),
        page_ids: page_ids.iter().map(|p| p.to_string()).collect(),
        media_urls: Vec::new(),
        scheduled_at,
        status: PostStatus::Scheduled,
        created_at: scheduled_at - chrono::Duration::hours(1),
        last_error: None,
        published_post_ids: Vec::new(),
    }
}
