//! Post publishing pipeline: token verification, media upload, per-Page
//! publishing and multi-Page distribution.

pub mod distributor;
pub mod errors;
pub mod media;
pub mod publisher;
pub mod token_verifier;

pub use distributor::{distribute_post, Distribution};
pub use errors::PublishError;
pub use media::{
    validate_media_file, MediaFile, MediaInput, MediaItem, MediaKind, NoopObserver,
    TracingObserver, UploadObserver, UploadedMedia,
};
pub use publisher::{publish_to_page, validate_media_set};
pub use token_verifier::{resolve_page_token, verify_token, TokenInfo, TokenType};
