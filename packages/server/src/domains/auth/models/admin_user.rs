use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::UserId;
use crate::kernel::BaseAdminUserStore;

/// Only this role may sign in to the dashboard.
pub const ADMIN_ROLE: &str = "admin";

/// A dashboard account from `authorized_users`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Lowercase and trim an email for lookups and attempt tracking.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// SQL Queries
// =============================================================================

impl AdminUser {
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM authorized_users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(
        email: &str,
        password_hash: &str,
        role: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO authorized_users (id, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(UserId::new())
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}

pub struct PgAdminUserStore {
    pool: PgPool,
}

impl PgAdminUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAdminUserStore for PgAdminUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        AdminUser::find_by_email(email, &self.pool).await
    }
}
