//! Tagged error classification shared by every layer.
//!
//! Domain errors expose `kind()`; the HTTP layer serialises the kind next to
//! the message so clients can branch on it without parsing text.

use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Authentication
    Unauthenticated,
    UserNotFound,
    UnauthorizedRole,
    InvalidPassword,
    AccountLocked,

    // Facebook tokens
    InvalidToken,
    InvalidTokenType,
    MissingPermissions,

    // Media
    ImageTooLarge,
    VideoTooLarge,
    UnsupportedMediaType,
    InvalidUrl,
    MultipleVideos,
    VideoNotSchedulable,
    ScheduledMediaRequiresUrl,

    // Distribution
    NoPagesSelected,
    EmptyPost,
    NoPageCredentials,
    PageNotFound,

    // Facebook API
    RateLimited,
    NotPageAdmin,
    VisibilityRestricted,
    FacebookApi,

    // Generic
    Validation,
    NotFound,
    Upstream,
    Internal,
}

const PERMISSION_CHECKLIST: &[&str] = &[
    "Confirm you are an admin of the Facebook Page",
    "Re-generate the Page access token with pages_manage_posts and pages_read_engagement",
    "Make sure the app is in Live mode or you are listed as a developer/tester",
    "Replace the stored token on the Pages screen and try again",
];

const TOKEN_CHECKLIST: &[&str] = &[
    "Generate a fresh Page access token in the Graph API Explorer",
    "Replace the stored token on the Pages screen",
];

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        use ErrorKind::*;
        match self {
            Unauthenticated | UserNotFound | InvalidPassword => StatusCode::UNAUTHORIZED,
            UnauthorizedRole => StatusCode::FORBIDDEN,
            AccountLocked | RateLimited => StatusCode::TOO_MANY_REQUESTS,
            InvalidToken | InvalidTokenType | MissingPermissions | NotPageAdmin
            | VisibilityRestricted => StatusCode::UNPROCESSABLE_ENTITY,
            ImageTooLarge | VideoTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            InvalidUrl | MultipleVideos | VideoNotSchedulable | ScheduledMediaRequiresUrl
            | NoPagesSelected | EmptyPost | NoPageCredentials | Validation => {
                StatusCode::BAD_REQUEST
            }
            PageNotFound | NotFound => StatusCode::NOT_FOUND,
            FacebookApi | Upstream => StatusCode::BAD_GATEWAY,
            Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Steps a user can take to fix permission and token problems.
    pub fn remediation(self) -> Option<&'static [&'static str]> {
        match self {
            ErrorKind::MissingPermissions | ErrorKind::NotPageAdmin => Some(PERMISSION_CHECKLIST),
            ErrorKind::InvalidToken | ErrorKind::InvalidTokenType => Some(TOKEN_CHECKLIST),
            _ => None,
        }
    }
}
