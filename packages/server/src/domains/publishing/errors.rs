use facebook_graph::GraphError;
use thiserror::Error;

use crate::common::ErrorKind;

/// Everything that can stop a post from reaching a Page.
#[derive(Error, Debug)]
pub enum PublishError {
    // --- Token verification ---
    #[error("Access token is not valid: {0}")]
    InvalidToken(String),

    #[error("Could not verify access token: {0}")]
    TokenVerificationFailed(#[source] GraphError),

    #[error("Expected a {expected} token but got {actual}")]
    InvalidTokenType { expected: String, actual: String },

    #[error("Access token is missing permissions: {}", .missing.join(", "))]
    MissingPermissions { missing: Vec<String> },

    // --- Media validation ---
    #[error("Image {file_name} is {size} bytes; the limit is {limit} bytes")]
    ImageTooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },

    #[error("Video {file_name} is {size} bytes; the limit is {limit} bytes")]
    VideoTooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },

    #[error("Unsupported media type {mime_type} for {file_name}")]
    UnsupportedMediaType {
        file_name: String,
        mime_type: String,
    },

    #[error("File {file_name} is not valid base64: {reason}")]
    InvalidMediaData { file_name: String, reason: String },

    #[error("Invalid media URL: {0}")]
    InvalidUrl(String),

    #[error("Multiple videos, or a video mixed with other media, cannot be published in one post")]
    MultipleVideos,

    // --- Distribution ---
    #[error("Select at least one Page")]
    NoPagesSelected,

    #[error("A post needs text content or media")]
    EmptyPost,

    #[error("No Facebook Pages are configured for this account")]
    NoPageCredentials,

    #[error("No stored credentials for Page {0}")]
    PageNotFound(String),

    // --- Facebook / infrastructure ---
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::InvalidToken(_) | PublishError::TokenVerificationFailed(_) => {
                ErrorKind::InvalidToken
            }
            PublishError::InvalidTokenType { .. } => ErrorKind::InvalidTokenType,
            PublishError::MissingPermissions { .. } => ErrorKind::MissingPermissions,
            PublishError::ImageTooLarge { .. } => ErrorKind::ImageTooLarge,
            PublishError::VideoTooLarge { .. } => ErrorKind::VideoTooLarge,
            PublishError::UnsupportedMediaType { .. } => ErrorKind::UnsupportedMediaType,
            PublishError::InvalidMediaData { .. } => ErrorKind::Validation,
            PublishError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            PublishError::MultipleVideos => ErrorKind::MultipleVideos,
            PublishError::NoPagesSelected => ErrorKind::NoPagesSelected,
            PublishError::EmptyPost => ErrorKind::EmptyPost,
            PublishError::NoPageCredentials => ErrorKind::NoPageCredentials,
            PublishError::PageNotFound(_) => ErrorKind::PageNotFound,
            PublishError::Graph(err) => graph_error_kind(err),
            PublishError::Storage(_) => ErrorKind::Internal,
        }
    }
}

fn graph_error_kind(err: &GraphError) -> ErrorKind {
    match err {
        GraphError::InvalidToken(_) => ErrorKind::InvalidToken,
        GraphError::MissingPermissions(_) => ErrorKind::MissingPermissions,
        GraphError::RateLimited(_) => ErrorKind::RateLimited,
        GraphError::NotPageAdmin(_) => ErrorKind::NotPageAdmin,
        GraphError::VisibilityRestricted(_) => ErrorKind::VisibilityRestricted,
        GraphError::Api { .. } | GraphError::Http(_) | GraphError::UnexpectedResponse(_) => {
            ErrorKind::FacebookApi
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_keep_their_classification() {
        let err = PublishError::from(GraphError::RateLimited("slow down".into()));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.to_string().contains("slow down"));

        let err = PublishError::from(GraphError::Api {
            status: 500,
            code: Some(1),
            message: "An unknown error occurred".into(),
        });
        assert_eq!(err.kind(), ErrorKind::FacebookApi);
        assert_eq!(err.to_string(), "An unknown error occurred");
    }

    #[test]
    fn test_missing_permissions_lists_scopes() {
        let err = PublishError::MissingPermissions {
            missing: vec!["pages_manage_posts".into(), "pages_read_engagement".into()],
        };
        assert_eq!(
            err.to_string(),
            "Access token is missing permissions: pages_manage_posts, pages_read_engagement"
        );
    }
}
