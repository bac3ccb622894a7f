//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Scheduled post dispatch on a fixed interval
//! - Expired session sweep every ten minutes
//!
//! ```text
//! Scheduler (every N seconds)
//!     │
//!     └─► PostScheduler::tick(now)
//!             └─► For each due entry → distribute_post → mark published/failed
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::auth::MemorySessionStore;
use crate::domains::posts::PostScheduler;

/// Start all scheduled tasks
pub async fn start_scheduler(
    post_scheduler: Arc<PostScheduler>,
    sessions: Arc<MemorySessionStore>,
    interval_secs: u64,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let dispatch_job = Job::new_repeated_async(
        Duration::from_secs(interval_secs),
        move |_uuid, _lock| {
            let post_scheduler = post_scheduler.clone();
            Box::pin(async move {
                run_scheduled_posts(&post_scheduler).await;
            })
        },
    )?;
    scheduler.add(dispatch_job).await?;

    let sweep_job = Job::new_async("0 */10 * * * *", move |_uuid, _lock| {
        let sessions = sessions.clone();
        Box::pin(async move {
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Expired sessions removed");
            }
        })
    })?;
    scheduler.add(sweep_job).await?;

    scheduler.start().await?;

    tracing::info!(
        interval_secs,
        "Scheduled tasks started (post dispatch, session sweep every 10 minutes)"
    );
    Ok(scheduler)
}

/// One dispatch pass; errors are logged and the next tick tries again.
async fn run_scheduled_posts(post_scheduler: &PostScheduler) {
    match post_scheduler.tick(Utc::now()).await {
        Ok(report) if report.due > 0 || report.unsaved > 0 => {
            tracing::info!(
                due = report.due,
                published = report.published,
                failed = report.failed,
                unsaved = report.unsaved,
                "Scheduled post pass complete"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "Scheduled post pass failed"),
    }
}
