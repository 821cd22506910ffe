//! Cron-style job scheduler using tokio-cron-scheduler.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use cadence_core::services::SchedulingService;

use super::SchedulerConfig;

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
}

impl Scheduler {
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, config })
    }

    /// Add a cron job.
    ///
    /// # Example
    /// ```ignore
    /// scheduler.add_cron("0 0 * * * *", || async {
    ///     tracing::info!("Running hourly job");
    /// }).await?;
    /// ```
    pub async fn add_cron<F, Fut>(
        &self,
        schedule: &str,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

/// Register the publish and auto-approval sweeps across all tenants and
/// start the scheduler. Returns `None` when scheduling is disabled.
pub async fn start_sweep_schedule(
    config: SchedulerConfig,
    scheduling: Arc<SchedulingService>,
) -> Result<Option<Scheduler>, JobSchedulerError> {
    if !config.enabled {
        tracing::info!("Scheduler disabled, sweeps run only on manual trigger");
        return Ok(None);
    }

    let schedule = config.sweep_schedule.clone();
    let scheduler = Scheduler::new(config).await?;
    scheduler
        .add_cron(&schedule, move || {
            let scheduling = scheduling.clone();
            async move {
                scheduling.run_sweeps(Utc::now(), None).await;
            }
        })
        .await?;
    scheduler.start().await?;

    Ok(Some(scheduler))
}
