//! Application state - shared across all handlers.

use std::sync::Arc;

use cadence_core::ports::{ApprovalNotifier, JobQueue, Repositories};
use cadence_core::publishing::{PublisherFactory, PublishingService};
use cadence_core::services::{AnalyticsService, ApprovalService, SchedulingService};
use cadence_infra::database::{DatabaseConfig, DatabaseConnections};
use cadence_infra::{
    in_memory_repositories, InMemoryJobQueue, InMemoryJobQueueConfig, LoggingApprovalNotifier,
    SimulatedTransport,
};

#[cfg(feature = "redis")]
use cadence_infra::RedisJobQueue;

use crate::config::{AppConfig, JobQueueSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub publishing: Arc<PublishingService>,
    pub scheduling: Arc<SchedulingService>,
    pub approvals: Arc<ApprovalService>,
    pub analytics: Arc<AnalyticsService>,
    /// Background queue for analytics pulls; `None` runs them inline.
    pub jobs: Option<Arc<dyn JobQueue>>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, repos) = Self::connect(config.database.as_ref()).await;
        let jobs = Self::job_queue(&config.jobs).await;

        let state = Self::assemble(repos, db, jobs, config);
        tracing::info!(
            database = state.db.is_some(),
            job_queue = state.jobs.as_ref().map(|q| q.backend()).unwrap_or("none"),
            "Application state initialized"
        );
        state
    }

    /// Wire the services over already-built repositories and queue.
    pub fn assemble(
        repos: Repositories,
        db: Option<Arc<DatabaseConnections>>,
        jobs: Option<Arc<dyn JobQueue>>,
        config: &AppConfig,
    ) -> Self {
        let notifier: Arc<dyn ApprovalNotifier> = Arc::new(LoggingApprovalNotifier);

        let publishers = PublisherFactory::new(Arc::new(SimulatedTransport::new(
            config.transport.clone(),
        )));
        let publishing = PublishingService::new(
            repos.clone(),
            Arc::new(publishers),
            config.publishing.clone(),
        );

        let scheduling = SchedulingService::new(
            repos.clone(),
            Arc::new(SimulatedTransport::new(config.sweep_transport.clone())),
            notifier.clone(),
            config.sweep.clone(),
        );

        Self {
            publishing: Arc::new(publishing),
            scheduling: Arc::new(scheduling),
            approvals: Arc::new(ApprovalService::new(repos.clone(), notifier)),
            analytics: Arc::new(AnalyticsService::new(repos.clone())),
            repos,
            jobs,
            db,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(
        config: Option<&DatabaseConfig>,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        let Some(config) = config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (None, in_memory_repositories());
        };

        match DatabaseConnections::init(config).await {
            Ok(connections) => {
                tracing::info!(
                    secondary = ?connections.secondary_names(),
                    "Database connections established"
                );
                let repos = connections.repositories();
                (Some(Arc::new(connections)), repos)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                (None, in_memory_repositories())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(
        config: Option<&DatabaseConfig>,
    ) -> (Option<Arc<DatabaseConnections>>, Repositories) {
        if config.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        (None, in_memory_repositories())
    }

    async fn job_queue(settings: &JobQueueSettings) -> Option<Arc<dyn JobQueue>> {
        #[cfg(feature = "redis")]
        if settings.redis {
            match RedisJobQueue::from_env().await {
                Ok(queue) => return Some(Arc::new(queue)),
                Err(e) => tracing::error!(error = %e, "Redis job queue unavailable"),
            }
        }

        #[cfg(not(feature = "redis"))]
        if settings.redis {
            tracing::warn!("REDIS_URL ignored: built without the redis feature");
        }

        if settings.in_memory {
            return Some(Arc::new(InMemoryJobQueue::new(
                InMemoryJobQueueConfig::from_env(),
            )));
        }

        None
    }
}
