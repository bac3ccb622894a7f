pub mod post_comment;

pub use post_comment::{NewPostComment, PostComment};
