//! Comments domain - pre-written comments admins post by hand.

pub mod models;

pub use models::{NewPostComment, PostComment};
