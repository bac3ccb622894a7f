use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Consecutive failures before an email is locked out.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// How long a lockout lasts.
pub const LOCKOUT_MINUTES: i64 = 15;

/// A signed-in dashboard session, keyed by its JWT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Failed sign-in bookkeeping for one email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempts {
    pub failed_count: u32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LoginAttempts {
    /// The lock end if the email is locked at `now`.
    pub fn locked_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_until.filter(|until| *until > now)
    }

    /// A lock that has run out wipes the slate.
    pub fn lock_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until <= now)
    }

    /// Count one more failure, locking once the limit is reached.
    pub fn record_failure(self, now: DateTime<Utc>) -> Self {
        let failed_count = self.failed_count + 1;
        let locked_until = if failed_count >= MAX_FAILED_ATTEMPTS {
            Some(now + Duration::minutes(LOCKOUT_MINUTES))
        } else {
            None
        };
        Self {
            failed_count,
            locked_until,
        }
    }

    pub fn remaining(&self) -> u32 {
        MAX_FAILED_ATTEMPTS.saturating_sub(self.failed_count)
    }
}
