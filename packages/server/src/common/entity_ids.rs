//! Typed ID aliases for every stored entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker for rows in `authorized_users`.
pub struct AdminUser;

/// Marker for rows in `facebook_pages`.
pub struct PageCredential;

/// Marker for posts (history rows and scheduled records share the id).
pub struct Post;

/// Marker for pre-seeded comments.
pub struct PostComment;

/// Marker for Apify topic searches.
pub struct TopicSearch;

/// Marker for individual topic results.
pub struct Topic;

// ============================================================================
// Type aliases
// ============================================================================

pub type UserId = Id<AdminUser>;
pub type PageCredentialId = Id<PageCredential>;
pub type PostId = Id<Post>;
pub type CommentId = Id<PostComment>;
pub type TopicSearchId = Id<TopicSearch>;
pub type TopicId = Id<Topic>;
