pub mod post;
pub mod scheduled_post;

pub use post::{PgPostStore, Post, PostStatus};
pub use scheduled_post::ScheduledPostRecord;
