//! Posts domain - composing, scheduling and dispatching Page posts
//!
//! Immediate posts go straight through the publishing pipeline. Scheduled
//! posts are written to the schedule store and picked up by `PostScheduler`
//! on its next tick.

pub mod actions;
pub mod models;
pub mod schedule_store;
pub mod scheduler;

pub use actions::{create_post, NewPost, PostError, PostOutcome};
pub use models::{PgPostStore, Post, PostStatus, ScheduledPostRecord};
pub use schedule_store::{JsonFileScheduleStore, ScheduleQueue};
pub use scheduler::{validate_schedule, PostScheduler, ScheduleError, TickReport};
