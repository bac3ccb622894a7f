//! Email and password sign-in for dashboard admins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::models::{normalize_email, AdminUser, LoginAttempts, Session};
use crate::common::ErrorKind;
use crate::kernel::ServerDeps;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No account found for {0}")]
    UserNotFound(String),

    #[error("{0} is not authorized to use the dashboard")]
    UnauthorizedRole(String),

    #[error("Incorrect password; {remaining_attempts} attempt(s) left before lockout")]
    InvalidPassword { remaining_attempts: u32 },

    #[error("Too many failed sign-in attempts; try again after {retry_after}")]
    AccountLocked { retry_after: DateTime<Utc> },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound(_) => ErrorKind::UserNotFound,
            AuthError::UnauthorizedRole(_) => ErrorKind::UnauthorizedRole,
            AuthError::InvalidPassword { .. } => ErrorKind::InvalidPassword,
            AuthError::AccountLocked { .. } => ErrorKind::AccountLocked,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginSuccess {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AdminUser,
}

/// Sign in and open a two-hour session.
pub async fn login(email: &str, password: &str, deps: &ServerDeps) -> Result<LoginSuccess, AuthError> {
    login_at(email, password, Utc::now(), deps).await
}

/// Sign-in with an explicit clock.
///
/// Order matters: a locked email is refused before the password is looked
/// at, so a correct password does not shorten a lockout.
pub async fn login_at(
    email: &str,
    password: &str,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<LoginSuccess, AuthError> {
    let email = normalize_email(email);

    let mut attempts = deps.sessions.get_attempts(&email).await?.unwrap_or_default();
    if let Some(retry_after) = attempts.locked_at(now) {
        tracing::info!(email = %email, %retry_after, "Sign-in refused; account locked");
        return Err(AuthError::AccountLocked { retry_after });
    }
    if attempts.lock_expired(now) {
        attempts = LoginAttempts::default();
    }

    let Some(user) = deps.admin_users.find_by_email(&email).await? else {
        record_failure(&email, attempts, now, deps).await?;
        return Err(AuthError::UserNotFound(email));
    };

    if !user.is_admin() {
        tracing::warn!(email = %email, role = %user.role, "Sign-in by non-admin account");
        return Err(AuthError::UnauthorizedRole(email));
    }

    if !verify_password(password, &user.password_hash).await? {
        let attempts = record_failure(&email, attempts, now, deps).await?;
        if let Some(retry_after) = attempts.locked_at(now) {
            return Err(AuthError::AccountLocked { retry_after });
        }
        return Err(AuthError::InvalidPassword {
            remaining_attempts: attempts.remaining(),
        });
    }

    deps.sessions.clear_attempts(&email).await?;

    let issued = deps.jwt_service.create_token(user.id, user.email.clone())?;
    deps.sessions
        .set_session(Session {
            token: issued.token.clone(),
            user_id: user.id,
            email: user.email.clone(),
            expires_at: issued.expires_at,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Admin signed in");
    Ok(LoginSuccess {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    })
}

/// End a session. Unknown tokens are ignored.
pub async fn logout(token: &str, deps: &ServerDeps) -> Result<(), AuthError> {
    deps.sessions.clear_session(token).await?;
    Ok(())
}

async fn record_failure(
    email: &str,
    attempts: LoginAttempts,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> Result<LoginAttempts, AuthError> {
    let attempts = attempts.record_failure(now);
    deps.sessions.set_attempts(email, attempts).await?;
    if attempts.locked_until.is_some() {
        tracing::warn!(email = %email, failed = attempts.failed_count, "Account locked after failed sign-ins");
    }
    Ok(attempts)
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(anyhow::Error::from)?;

    match verified {
        Ok(ok) => Ok(ok),
        Err(e) => {
            tracing::error!(error = %e, "Stored password hash is unreadable");
            Ok(false)
        }
    }
}
