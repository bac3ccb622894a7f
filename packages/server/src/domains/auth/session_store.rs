use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::models::{normalize_email, LoginAttempts, Session};
use crate::kernel::BaseSessionStore;

/// Process-local sessions and login attempts.
///
/// Everything is lost on restart, which signs every admin out.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
    attempts: DashMap<String, LoginAttempts>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired sessions.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before - self.sessions.len()
    }
}

#[async_trait]
impl BaseSessionStore for MemorySessionStore {
    async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let now = Utc::now();
        let session = self.sessions.get(token).map(|s| s.clone());
        match session {
            Some(s) if s.is_expired(now) => {
                self.sessions.remove(token);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn set_session(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn clear_session(&self, token: &str) -> Result<()> {
        self.sessions.remove(token);
        Ok(())
    }

    async fn get_attempts(&self, email: &str) -> Result<Option<LoginAttempts>> {
        Ok(self.attempts.get(&normalize_email(email)).map(|a| *a))
    }

    async fn set_attempts(&self, email: &str, attempts: LoginAttempts) -> Result<()> {
        self.attempts.insert(normalize_email(email), attempts);
        Ok(())
    }

    async fn clear_attempts(&self, email: &str) -> Result<()> {
        self.attempts.remove(&normalize_email(email));
        Ok(())
    }
}
