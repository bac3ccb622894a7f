use crate::common::UserId;
use crate::domains::auth::JwtService;
use crate::kernel::BaseSessionStore;
use crate::server::error::ApiError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Authenticated admin from a verified JWT with a live session
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub token: String,
}

/// JWT authentication middleware
///
/// Extracts the token from the Authorization header, verifies it and checks
/// that its session has not been logged out or expired. On success `AuthUser`
/// is added to request extensions; otherwise the request continues without it
/// and protected handlers reject it through the `AuthUser` extractor.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    sessions: Arc<dyn BaseSessionStore>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = match extract_bearer(&request) {
        Some(token) => authenticate(token, &jwt_service, sessions.as_ref()).await,
        None => None,
    };

    if let Some(user) = auth_user {
        debug!(user_id = %user.user_id, "Authenticated request");
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Pull the raw token out of the Authorization header
fn extract_bearer(request: &axum::http::Request<axum::body::Body>) -> Option<String> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

async fn authenticate(
    token: String,
    jwt_service: &JwtService,
    sessions: &dyn BaseSessionStore,
) -> Option<AuthUser> {
    let claims = jwt_service.verify_token(&token).ok()?;

    let session = match sessions.get_session(&token).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            debug!(user_id = %claims.user_id, "Token has no live session");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed");
            return None;
        }
    };
    if session.is_expired(Utc::now()) || session.user_id != claims.user_id {
        return None;
    }

    Some(AuthUser {
        user_id: claims.user_id,
        email: claims.email,
        token,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(ApiError::unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::{MemorySessionStore, Session};

    fn request_with(header: Option<String>) -> axum::http::Request<axum::body::Body> {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    async fn signed_in(
        jwt_service: &JwtService,
        sessions: &MemorySessionStore,
    ) -> (UserId, String) {
        let user_id = UserId::new();
        let issued = jwt_service
            .create_token(user_id, "admin@example.org".to_string())
            .unwrap();
        sessions
            .set_session(Session {
                token: issued.token.clone(),
                user_id,
                email: "admin@example.org".to_string(),
                expires_at: issued.expires_at,
            })
            .await
            .unwrap();
        (user_id, issued.token)
    }

    #[tokio::test]
    async fn test_extract_token_with_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let sessions = MemorySessionStore::new();
        let (user_id, token) = signed_in(&jwt_service, &sessions).await;

        let request = request_with(Some(format!("Bearer {}", token)));
        let token = extract_bearer(&request).unwrap();
        let auth_user = authenticate(token, &jwt_service, &sessions).await;
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_extract_token_without_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let sessions = MemorySessionStore::new();
        let (user_id, token) = signed_in(&jwt_service, &sessions).await;

        let request = request_with(Some(token));
        let token = extract_bearer(&request).unwrap();
        let auth_user = authenticate(token, &jwt_service, &sessions).await;
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[test]
    fn test_no_auth_header() {
        assert!(extract_bearer(&request_with(None)).is_none());
        assert!(extract_bearer(&request_with(Some("Bearer ".into()))).is_none());
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let sessions = MemorySessionStore::new();

        let auth_user = authenticate("invalid_token".into(), &jwt_service, &sessions).await;
        assert!(auth_user.is_none());
    }

    #[tokio::test]
    async fn test_logged_out_token_is_rejected() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let sessions = MemorySessionStore::new();
        let (_, token) = signed_in(&jwt_service, &sessions).await;
        sessions.clear_session(&token).await.unwrap();

        let auth_user = authenticate(token, &jwt_service, &sessions).await;
        assert!(auth_user.is_none());
    }
}
