//! Job queue implementations.
//!
//! Both backends share the bookkeeping in [`JobStats`] and the retry decision
//! in [`JobStats::settle`]; they differ only in where pending jobs live.

use std::sync::atomic::{AtomicUsize, Ordering};

use cadence_core::ports::{Job, JobResult, QueueStats};

mod memory;

pub use memory::{InMemoryJobQueue, InMemoryJobQueueConfig};

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisJobQueue, RedisJobQueueConfig};

#[derive(Debug, Default)]
pub(crate) struct JobStats {
    pending: AtomicUsize,
    processing: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl JobStats {
    pub(crate) fn enqueued(&self) {
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub(crate) fn started(&self) {
        self.pending.fetch_sub(1, Ordering::Relaxed);
        self.processing.fetch_add(1, Ordering::Relaxed);
    }

    /// A pending job that will never reach a handler.
    pub(crate) fn lost(&self) {
        self.pending.fetch_sub(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the handler's verdict. Returns the job when it should run again.
    pub(crate) fn settle(&self, job: Job, result: JobResult) -> Option<Job> {
        self.processing.fetch_sub(1, Ordering::Relaxed);

        match result {
            JobResult::Success => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(job_id = %job.id, job_type = %job.job_type, "Job completed");
                None
            }
            JobResult::Retry(reason) if job.attempts < job.max_attempts => {
                tracing::warn!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    attempt = job.attempts,
                    max_attempts = job.max_attempts,
                    reason = %reason,
                    "Job failed, will retry"
                );
                Some(job)
            }
            JobResult::Retry(reason) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(job_id = %job.id, job_type = %job.job_type, reason = %reason, "Job failed after max retries");
                None
            }
            JobResult::Failed(reason) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(job_id = %job.id, job_type = %job.job_type, reason = %reason, "Job failed permanently");
                None
            }
        }
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            pending: self.pending.load(Ordering::Relaxed),
            processing: self.processing.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
