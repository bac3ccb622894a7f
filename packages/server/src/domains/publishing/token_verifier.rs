use chrono::{DateTime, Utc};
use facebook_graph::GraphError;
use serde::Serialize;

use super::errors::PublishError;
use crate::kernel::BaseFacebookGraph;

/// Scopes a user token needs before it can be exchanged for a Page token.
pub const REQUIRED_PAGE_SCOPES: &[&str] = &["pages_manage_posts", "pages_read_engagement"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    User,
    Page,
    Other(String),
}

impl TokenType {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_uppercase()) {
            Some(s) if s == "USER" => TokenType::User,
            Some(s) if s == "PAGE" => TokenType::Page,
            Some(s) => TokenType::Other(s),
            None => TokenType::Other("UNKNOWN".to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            TokenType::User => "USER",
            TokenType::Page => "PAGE",
            TokenType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub user_id: Option<String>,
    pub app_id: Option<String>,
    pub token_type: TokenType,
    pub scopes: Vec<String>,
    /// `None` for tokens that never expire.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Check liveness, type and scopes of a token with one debug call.
///
/// Scopes are only enforced for USER tokens; Page tokens inherit them.
pub async fn verify_token(
    graph: &dyn BaseFacebookGraph,
    token: &str,
    required_scopes: &[&str],
    expected_type: Option<TokenType>,
) -> Result<TokenInfo, PublishError> {
    let data = graph.debug_token(token).await.map_err(|e| match e {
        GraphError::InvalidToken(message) => PublishError::InvalidToken(message),
        other => PublishError::TokenVerificationFailed(other),
    })?;

    if !data.is_valid {
        return Err(PublishError::InvalidToken(
            "token is expired or has been revoked".to_string(),
        ));
    }

    let info = TokenInfo {
        user_id: data.user_id,
        app_id: data.app_id,
        token_type: TokenType::parse(data.token_type.as_deref()),
        scopes: data.scopes,
        expires_at: data
            .expires_at
            .filter(|secs| *secs > 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    };

    if let Some(expected) = expected_type {
        if info.token_type != expected {
            return Err(PublishError::InvalidTokenType {
                expected: expected.as_str().to_string(),
                actual: info.token_type.as_str().to_string(),
            });
        }
    }

    if info.token_type == TokenType::User {
        let missing: Vec<String> = required_scopes
            .iter()
            .filter(|scope| !info.scopes.iter().any(|s| s == *scope))
            .map(|scope| scope.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PublishError::MissingPermissions { missing });
        }
    }

    Ok(info)
}

/// Turn a stored credential token into a verified Page token.
///
/// Page tokens are used as they are. User tokens must carry the publishing
/// scopes and are exchanged for the Page's own token.
pub async fn resolve_page_token(
    graph: &dyn BaseFacebookGraph,
    page_id: &str,
    stored_token: &str,
) -> Result<String, PublishError> {
    let info = verify_token(graph, stored_token, REQUIRED_PAGE_SCOPES, None).await?;

    match info.token_type {
        TokenType::Page => Ok(stored_token.to_string()),
        TokenType::User => {
            tracing::debug!(page_id, "Exchanging user token for page token");
            let page_token = graph.page_access_token(page_id, stored_token).await?;
            verify_token(graph, &page_token, &[], Some(TokenType::Page)).await?;
            Ok(page_token)
        }
        TokenType::Other(actual) => Err(PublishError::InvalidTokenType {
            expected: "PAGE".to_string(),
            actual,
        }),
    }
}
