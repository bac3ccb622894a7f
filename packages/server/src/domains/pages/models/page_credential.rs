use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{PageCredentialId, UserId};
use crate::kernel::BasePageCredentialStore;

/// A Facebook Page and the token used to post to it, owned by one admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PageCredential {
    pub id: PageCredentialId,
    pub user_id: UserId,
    pub name: String,
    pub page_id: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

/// Setup form input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPageCredential {
    pub name: String,
    pub page_id: String,
    pub access_token: String,
}

impl NewPageCredential {
    /// Trim every field and require all of them.
    pub fn normalized(self) -> Result<Self> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            page_id: self.page_id.trim().to_string(),
            access_token: self.access_token.trim().to_string(),
        };
        if normalized.name.is_empty() {
            bail!("Page name is required");
        }
        if normalized.page_id.is_empty() {
            bail!("Page ID is required");
        }
        if normalized.access_token.is_empty() {
            bail!("Page access token is required");
        }
        Ok(normalized)
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl PageCredential {
    pub async fn create(user_id: UserId, input: &NewPageCredential, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO facebook_pages (id, user_id, name, page_id, access_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(PageCredentialId::new())
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.page_id)
        .bind(&input.access_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM facebook_pages WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(user_id: UserId, id: PageCredentialId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM facebook_pages WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed credential store.
pub struct PgPageCredentialStore {
    pool: PgPool,
}

impl PgPageCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BasePageCredentialStore for PgPageCredentialStore {
    async fn create(&self, user_id: UserId, input: NewPageCredential) -> Result<PageCredential> {
        PageCredential::create(user_id, &input, &self.pool).await
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PageCredential>> {
        PageCredential::find_for_user(user_id, &self.pool).await
    }

    async fn delete(&self, user_id: UserId, id: PageCredentialId) -> Result<bool> {
        PageCredential::delete(user_id, id, &self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_fields() {
        let input = NewPageCredential {
            name: "  Food Shelf ".into(),
            page_id: " 12345 ".into(),
            access_token: "EAAB\n".into(),
        }
        .normalized()
        .unwrap();
        assert_eq!(input.name, "Food Shelf");
        assert_eq!(input.page_id, "12345");
        assert_eq!(input.access_token, "EAAB");
    }

    #[test]
    fn test_normalized_requires_every_field() {
        let missing_token = NewPageCredential {
            name: "Page".into(),
            page_id: "1".into(),
            access_token: "  ".into(),
        };
        let err = missing_token.normalized().unwrap_err();
        assert_eq!(err.to_string(), "Page access token is required");
    }
}
