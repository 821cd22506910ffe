//! Repository ports, one narrow trait per entity.
//!
//! Every lookup that answers a tenant's request goes through a `*_for_tenant`
//! method; unscoped lookups are reserved for the cron sweep and for callers
//! that already proved ownership of the parent post.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    ApprovalLog, Brand, Post, PostAnalytics, PostStatus, Schedule, ScheduleStatus, Tenant, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

#[async_trait]
pub trait TenantRepository: BaseRepository<Tenant, Uuid> {}

#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait BrandRepository: BaseRepository<Brand, Uuid> {
    async fn find_for_tenant(&self, id: Uuid, tenant_id: Uuid)
    -> Result<Option<Brand>, RepoError>;

    async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Brand>, RepoError>;
}

/// Number of a tenant's posts in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: PostStatus,
    pub count: u64,
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_for_tenant(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError>;

    async fn list_published_for_brand(
        &self,
        tenant_id: Uuid,
        brand_id: Uuid,
    ) -> Result<Vec<Post>, RepoError>;

    /// Set the status column alone; `published_at` is written only when `Some`.
    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError>;

    async fn count_by_status(&self, tenant_id: Uuid) -> Result<Vec<StatusCount>, RepoError>;
}

#[async_trait]
pub trait ScheduleRepository: BaseRepository<Schedule, Uuid> {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Option<Schedule>, RepoError>;

    async fn update_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), RepoError>;

    /// Pending schedules with `run_at <= now`, optionally limited to one tenant.
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError>;

    /// Pending schedules with `from <= run_at <= to`.
    async fn find_pending_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError>;

    async fn count_pending(&self, tenant_id: Uuid) -> Result<u64, RepoError>;
}

/// Append-only store of analytics data points.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn append(&self, record: PostAnalytics) -> Result<PostAnalytics, RepoError>;

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostAnalytics>, RepoError>;
}

/// Append-only approval audit trail.
#[async_trait]
pub trait ApprovalLogRepository: Send + Sync {
    async fn append(&self, log: ApprovalLog) -> Result<ApprovalLog, RepoError>;

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<ApprovalLog>, RepoError>;
}

/// Every repository the services need, bundled for injection.
#[derive(Clone)]
pub struct Repositories {
    pub tenants: Arc<dyn TenantRepository>,
    pub users: Arc<dyn UserRepository>,
    pub brands: Arc<dyn BrandRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub approvals: Arc<dyn ApprovalLogRepository>,
}
