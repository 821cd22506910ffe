//! Job queue worker: routes queued jobs to the service that owns them.

use std::sync::Arc;

use cadence_core::ports::{JobHandler, JobQueue, JobQueueError, JobResult};
use cadence_core::services::{ANALYTICS_PULL_JOB, AnalyticsService};

/// Handler for every job type the server enqueues.
pub fn job_handler(analytics: Arc<AnalyticsService>) -> JobHandler {
    Arc::new(move |job| {
        let analytics = analytics.clone();
        Box::pin(async move {
            match job.job_type.as_str() {
                ANALYTICS_PULL_JOB => analytics.handle_job(job).await,
                other => {
                    tracing::warn!(job_id = %job.id, job_type = %other, "Dropping job of unknown type");
                    JobResult::Failed(format!("unknown job type: {other}"))
                }
            }
        })
    })
}

pub async fn start_job_worker(
    queue: &dyn JobQueue,
    analytics: Arc<AnalyticsService>,
) -> Result<(), JobQueueError> {
    queue.start_worker(job_handler(analytics)).await?;
    tracing::info!(backend = queue.backend(), "Job worker started");
    Ok(())
}
