use thiserror::Error;

use crate::types::GraphErrorBody;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors returned by the Graph API, classified by Facebook error code.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Code 190.
    #[error("Facebook access token is invalid or has expired: {0}")]
    InvalidToken(String),

    /// Codes 10 and 100.
    #[error("Facebook rejected the request because of missing permissions: {0}")]
    MissingPermissions(String),

    /// Code 368.
    #[error("Facebook is temporarily blocking this action (rate limited): {0}")]
    RateLimited(String),

    /// Code 200.
    #[error("This token is not allowed to post as the Page; Page admin rights are required: {0}")]
    NotPageAdmin(String),

    /// Code 294.
    #[error("Facebook blocked the post because of a Page visibility restriction: {0}")]
    VisibilityRestricted(String),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Unexpected Graph API response: {0}")]
    UnexpectedResponse(String),
}

/// Map a non-success Graph API response body to a typed error.
///
/// Bodies that are not the standard `{"error": {...}}` envelope are passed
/// through verbatim.
pub fn classify_error(status: u16, body: &str) -> GraphError {
    let Ok(parsed) = serde_json::from_str::<GraphErrorBody>(body) else {
        return GraphError::Api {
            status,
            code: None,
            message: body.to_string(),
        };
    };

    let detail = parsed.error;
    match detail.code {
        Some(190) => GraphError::InvalidToken(detail.message),
        Some(10) | Some(100) => GraphError::MissingPermissions(detail.message),
        Some(368) => GraphError::RateLimited(detail.message),
        Some(200) => GraphError::NotPageAdmin(detail.message),
        Some(294) => GraphError::VisibilityRestricted(detail.message),
        code => GraphError::Api {
            status,
            code,
            message: detail.message,
        },
    }
}
