//! In-memory job queue, used when Redis is not configured.
//!
//! Jobs are lost on restart.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use cadence_core::ports::{Job, JobHandler, JobQueue, JobQueueError, QueueStats};

use super::JobStats;

#[derive(Debug, Clone)]
pub struct InMemoryJobQueueConfig {
    /// Maximum queue size (0 = unlimited).
    pub max_size: usize,
    /// Number of worker tasks.
    pub workers: usize,
    /// Base backoff before a retried job is re-queued; scaled by attempt.
    pub retry_backoff: Duration,
}

impl Default for InMemoryJobQueueConfig {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            workers: 4,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

impl InMemoryJobQueueConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: std::env::var("JOB_QUEUE_MAX_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            workers: std::env::var("JOB_QUEUE_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.workers),
            retry_backoff: defaults.retry_backoff,
        }
    }
}

pub struct InMemoryJobQueue {
    stats: Arc<JobStats>,
    config: InMemoryJobQueueConfig,
    job_sender: mpsc::Sender<Job>,
    job_receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
}

impl InMemoryJobQueue {
    pub fn new(config: InMemoryJobQueueConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.max_size.max(100));

        Self {
            stats: Arc::new(JobStats::default()),
            config,
            job_sender: tx,
            job_receiver: Arc::new(Mutex::new(rx)),
        }
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError> {
        if self.config.max_size > 0 && self.stats.pending() >= self.config.max_size {
            return Err(JobQueueError::QueueFull);
        }

        self.stats.enqueued();
        tracing::debug!(job_id = %job.id, job_type = %job.job_type, "Job enqueued");

        self.job_sender
            .send(job)
            .await
            .map_err(|e| JobQueueError::EnqueueError(e.to_string()))
    }

    async fn start_worker(&self, handler: JobHandler) -> Result<(), JobQueueError> {
        for worker_id in 0..self.config.workers {
            let handler = handler.clone();
            let receiver = self.job_receiver.clone();
            let stats = self.stats.clone();
            let sender = self.job_sender.clone();
            let backoff = self.config.retry_backoff;

            tokio::spawn(async move {
                tracing::info!(worker_id, "Job worker started");

                loop {
                    let job = {
                        let mut rx = receiver.lock().await;
                        rx.recv().await
                    };
                    let Some(mut job) = job else {
                        tracing::info!(worker_id, "Job worker shutting down");
                        break;
                    };

                    stats.started();
                    job.attempts += 1;
                    tracing::debug!(worker_id, job_id = %job.id, job_type = %job.job_type, "Processing job");

                    let result = handler(job.clone()).await;
                    if let Some(retry) = stats.settle(job, result) {
                        stats.enqueued();
                        let sender = sender.clone();
                        let stats = stats.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(backoff * retry.attempts).await;
                            if let Err(e) = sender.send(retry).await {
                                stats.lost();
                                tracing::error!(error = %e, "Failed to re-enqueue job for retry");
                            }
                        });
                    }
                }
            });
        }

        Ok(())
    }

    async fn stats(&self) -> Result<QueueStats, JobQueueError> {
        Ok(self.stats.snapshot())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
