//! Redis job queue built on a LIST: `RPUSH` to enqueue, `BLPOP` to consume.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use cadence_core::ports::{Job, JobHandler, JobQueue, JobQueueError, QueueStats};

use super::JobStats;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedisJobQueueConfig {
    pub redis: RedisConfig,
    /// Key prefix; pending jobs live under `<queue_name>:pending`.
    pub queue_name: String,
    pub workers: usize,
    /// Timeout for blocking pop (seconds)
    pub pop_timeout: u64,
}

impl Default for RedisJobQueueConfig {
    fn default() -> Self {
        Self {
            redis: RedisConfig::default(),
            queue_name: "cadence:jobs".to_string(),
            workers: 4,
            pop_timeout: 5,
        }
    }
}

impl RedisJobQueueConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis: RedisConfig::from_env(),
            queue_name: std::env::var("JOB_QUEUE_NAME").unwrap_or(defaults.queue_name),
            workers: std::env::var("JOB_QUEUE_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.workers),
            pop_timeout: std::env::var("JOB_QUEUE_POP_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.pop_timeout),
        }
    }
}

pub struct RedisJobQueue {
    conn: ConnectionManager,
    config: RedisJobQueueConfig,
    stats: Arc<JobStats>,
    running: Arc<AtomicBool>,
}

impl RedisJobQueue {
    pub async fn new(config: RedisJobQueueConfig) -> Result<Self, JobQueueError> {
        let client = Client::open(config.redis.url.as_str())
            .map_err(|e| JobQueueError::Backend(e.to_string()))?;

        // Bounded so an unreachable Redis fails startup instead of hanging it
        let conn = tokio::time::timeout(config.redis.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| JobQueueError::Backend("Connection timed out".to_string()))?
            .map_err(|e| JobQueueError::Backend(e.to_string()))?;

        tracing::info!(
            queue = %config.queue_name,
            workers = config.workers,
            "Connected to Redis job queue"
        );

        Ok(Self {
            conn,
            config,
            stats: Arc::new(JobStats::default()),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    pub async fn from_env() -> Result<Self, JobQueueError> {
        Self::new(RedisJobQueueConfig::from_env()).await
    }

    /// Ask workers to exit after their current pop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    fn pending_key(&self) -> String {
        format!("{}:pending", self.config.queue_name)
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError> {
        let mut conn = self.conn.clone();
        let job_json =
            serde_json::to_string(&job).map_err(|e| JobQueueError::EnqueueError(e.to_string()))?;

        conn.rpush::<_, _, ()>(&self.pending_key(), &job_json)
            .await
            .map_err(|e| JobQueueError::Backend(e.to_string()))?;

        self.stats.enqueued();
        tracing::debug!(job_id = %job.id, job_type = %job.job_type, "Job enqueued");

        Ok(())
    }

    async fn start_worker(&self, handler: JobHandler) -> Result<(), JobQueueError> {
        self.running.store(true, Ordering::Relaxed);

        for worker_id in 0..self.config.workers {
            let mut conn = self.conn.clone();
            let pending_key = self.pending_key();
            let stats = self.stats.clone();
            let running = self.running.clone();
            let handler = handler.clone();
            let pop_timeout = self.config.pop_timeout as f64;

            tokio::spawn(async move {
                tracing::info!(worker_id, queue = %pending_key, "Job queue worker started");

                while running.load(Ordering::Relaxed) {
                    let result: Result<Option<(String, String)>, _> =
                        conn.blpop(&pending_key, pop_timeout).await;

                    let job_json = match result {
                        Ok(Some((_, json))) => json,
                        Ok(None) => continue,
                        Err(e) => {
                            tracing::error!(error = %e, "Redis BLPOP error");
                            tokio::time::sleep(Duration::from_secs(1)).await;
                            continue;
                        }
                    };

                    let mut job: Job = match serde_json::from_str(&job_json) {
                        Ok(job) => job,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to deserialize job");
                            stats.lost();
                            continue;
                        }
                    };

                    stats.started();
                    job.attempts += 1;
                    tracing::debug!(
                        worker_id,
                        job_id = %job.id,
                        job_type = %job.job_type,
                        attempt = job.attempts,
                        "Processing job"
                    );

                    let result = handler(job.clone()).await;
                    let Some(retry) = stats.settle(job, result) else {
                        continue;
                    };

                    stats.enqueued();
                    let requeued = match serde_json::to_string(&retry) {
                        Ok(json) => conn
                            .rpush::<_, _, ()>(&pending_key, &json)
                            .await
                            .map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    };
                    if let Err(e) = requeued {
                        stats.lost();
                        tracing::error!(job_id = %retry.id, error = %e, "Failed to re-enqueue job for retry");
                    }
                }

                tracing::info!(worker_id, "Job queue worker stopped");
            });
        }

        Ok(())
    }

    async fn stats(&self) -> Result<QueueStats, JobQueueError> {
        Ok(self.stats.snapshot())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
