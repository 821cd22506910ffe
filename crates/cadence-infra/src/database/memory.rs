//! In-memory repositories for tests and database-less runs.
//!
//! Each store keeps its rows in a `tokio::sync::RwLock<HashMap>` and enforces
//! the same uniqueness rules as the Postgres schema.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use cadence_core::domain::{
    ApprovalLog, Brand, Post, PostAnalytics, PostStatus, Schedule, ScheduleStatus, Tenant, User,
};
use cadence_core::error::RepoError;
use cadence_core::ports::{
    AnalyticsRepository, ApprovalLogRepository, BaseRepository, BrandRepository, PostRepository,
    Repositories, ScheduleRepository, StatusCount, TenantRepository, UserRepository,
};

/// Build a full repository bundle backed by fresh in-memory stores.
pub fn in_memory_repositories() -> Repositories {
    Repositories {
        tenants: Arc::new(InMemoryTenantRepository::default()),
        users: Arc::new(InMemoryUserRepository::default()),
        brands: Arc::new(InMemoryBrandRepository::default()),
        posts: Arc::new(InMemoryPostRepository::default()),
        schedules: Arc::new(InMemoryScheduleRepository::default()),
        analytics: Arc::new(InMemoryAnalyticsRepository::default()),
        approvals: Arc::new(InMemoryApprovalLogRepository::default()),
    }
}

/// Rows that carry a primary key.
trait Keyed {
    fn key(&self) -> Uuid;
}

macro_rules! keyed {
    ($($ty:ty),*) => {
        $(impl Keyed for $ty {
            fn key(&self) -> Uuid {
                self.id
            }
        })*
    };
}

keyed!(Tenant, User, Brand, Post, Schedule);

struct Table<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Keyed + Clone> Table<T> {
    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn insert(&self, row: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&row.key()) {
            return Err(RepoError::Constraint(format!("duplicate key {}", row.key())));
        }
        rows.insert(row.key(), row.clone());
        Ok(row)
    }

    async fn replace(&self, row: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&row.key()) {
            Some(existing) => {
                *existing = row.clone();
                Ok(row)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct InMemoryTenantRepository {
    table: Table<Tenant>,
}

#[async_trait]
impl BaseRepository<Tenant, Uuid> for InMemoryTenantRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, entity: Tenant) -> Result<Tenant, RepoError> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: Tenant) -> Result<Tenant, RepoError> {
        self.table.replace(entity).await
    }
}

impl TenantRepository for InMemoryTenantRepository {}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Table<User>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, entity: User) -> Result<User, RepoError> {
        let mut rows = self.table.rows.write().await;
        if rows.values().any(|u| u.email == entity.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        self.table.replace(entity).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .table
            .filter(|u| u.email == email)
            .await
            .into_iter()
            .next())
    }
}

#[derive(Default)]
pub struct InMemoryBrandRepository {
    table: Table<Brand>,
}

#[async_trait]
impl BaseRepository<Brand, Uuid> for InMemoryBrandRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Brand>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, entity: Brand) -> Result<Brand, RepoError> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: Brand) -> Result<Brand, RepoError> {
        self.table.replace(entity).await
    }
}

#[async_trait]
impl BrandRepository for InMemoryBrandRepository {
    async fn find_for_tenant(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<Brand>, RepoError> {
        Ok(self.table.get(id).await.filter(|b| b.tenant_id == tenant_id))
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Brand>, RepoError> {
        let mut brands = self.table.filter(|b| b.tenant_id == tenant_id).await;
        brands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(brands)
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    table: Table<Post>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, entity: Post) -> Result<Post, RepoError> {
        self.table.insert(entity).await
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        self.table.replace(entity).await
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_for_tenant(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.table.get(id).await.filter(|p| p.tenant_id == tenant_id))
    }

    async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut posts = self
            .table
            .filter(|p| p.tenant_id == tenant_id && status.is_none_or(|s| p.status == s))
            .await;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_published_for_brand(
        &self,
        tenant_id: Uuid,
        brand_id: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        let mut posts = self
            .table
            .filter(|p| {
                p.tenant_id == tenant_id
                    && p.brand_id == brand_id
                    && p.status == PostStatus::Published
            })
            .await;
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError> {
        let mut rows = self.table.rows.write().await;
        let post = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.status = status;
        post.updated_at = Utc::now();
        if published_at.is_some() {
            post.published_at = published_at;
        }
        Ok(())
    }

    async fn count_by_status(&self, tenant_id: Uuid) -> Result<Vec<StatusCount>, RepoError> {
        let mut counts: HashMap<PostStatus, u64> = HashMap::new();
        for post in self.table.filter(|p| p.tenant_id == tenant_id).await {
            *counts.entry(post.status).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    table: Table<Schedule>,
}

#[async_trait]
impl BaseRepository<Schedule, Uuid> for InMemoryScheduleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Schedule>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn create(&self, entity: Schedule) -> Result<Schedule, RepoError> {
        let mut rows = self.table.rows.write().await;
        if rows.values().any(|s| s.post_id == entity.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} already has a schedule",
                entity.post_id
            )));
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Schedule) -> Result<Schedule, RepoError> {
        self.table.replace(entity).await
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Option<Schedule>, RepoError> {
        Ok(self
            .table
            .filter(|s| s.post_id == post_id)
            .await
            .into_iter()
            .next())
    }

    async fn update_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), RepoError> {
        let mut rows = self.table.rows.write().await;
        let schedule = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        schedule.status = status;
        schedule.updated_at = Utc::now();
        Ok(())
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        let mut due = self
            .table
            .filter(|s| {
                s.status == ScheduleStatus::Pending
                    && s.run_at <= now
                    && tenant_id.is_none_or(|t| s.tenant_id == t)
            })
            .await;
        due.sort_by_key(|s| s.run_at);
        Ok(due)
    }

    async fn find_pending_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        let mut pending = self
            .table
            .filter(|s| {
                s.status == ScheduleStatus::Pending
                    && s.run_at >= from
                    && s.run_at <= to
                    && tenant_id.is_none_or(|t| s.tenant_id == t)
            })
            .await;
        pending.sort_by_key(|s| s.run_at);
        Ok(pending)
    }

    async fn count_pending(&self, tenant_id: Uuid) -> Result<u64, RepoError> {
        let pending = self
            .table
            .filter(|s| s.tenant_id == tenant_id && s.status == ScheduleStatus::Pending)
            .await;
        Ok(pending.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryAnalyticsRepository {
    rows: RwLock<Vec<PostAnalytics>>,
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalyticsRepository {
    async fn append(&self, record: PostAnalytics) -> Result<PostAnalytics, RepoError> {
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostAnalytics>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryApprovalLogRepository {
    rows: RwLock<Vec<ApprovalLog>>,
}

#[async_trait]
impl ApprovalLogRepository for InMemoryApprovalLogRepository {
    async fn append(&self, log: ApprovalLog) -> Result<ApprovalLog, RepoError> {
        self.rows.write().await.push(log.clone());
        Ok(log)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<ApprovalLog>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::domain::{PostContent, Role};
    use chrono::TimeDelta;

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repo = InMemoryUserRepository::default();
        let tenant = Uuid::new_v4();
        repo.create(User::new(tenant, "a@example.com".into(), "h".into(), Role::Owner))
            .await
            .unwrap();

        let err = repo
            .create(User::new(tenant, "a@example.com".into(), "h".into(), Role::Editor))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_one_schedule_per_post() {
        let repo = InMemoryScheduleRepository::default();
        let now = Utc::now();
        let post_id = Uuid::new_v4();
        let tenant = Uuid::new_v4();
        let first =
            Schedule::new(post_id, tenant, now + TimeDelta::hours(1), "UTC".into(), now).unwrap();
        let second =
            Schedule::new(post_id, tenant, now + TimeDelta::hours(2), "UTC".into(), now).unwrap();

        repo.create(first).await.unwrap();
        assert!(matches!(
            repo.create(second).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_post_lookup_is_tenant_scoped() {
        let repo = InMemoryPostRepository::default();
        let tenant = Uuid::new_v4();
        let post = repo
            .create(Post::new(
                tenant,
                Uuid::new_v4(),
                "Hello".into(),
                PostContent::default(),
            ))
            .await
            .unwrap();

        assert!(repo.find_for_tenant(post.id, tenant).await.unwrap().is_some());
        assert!(repo
            .find_for_tenant(post.id, Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_pending_between_is_inclusive() {
        let repo = InMemoryScheduleRepository::default();
        let now = Utc::now();
        let tenant = Uuid::new_v4();
        let inside = Schedule::new(
            Uuid::new_v4(),
            tenant,
            now + TimeDelta::minutes(60),
            "UTC".into(),
            now,
        )
        .unwrap();
        let outside = Schedule::new(
            Uuid::new_v4(),
            tenant,
            now + TimeDelta::minutes(61),
            "UTC".into(),
            now,
        )
        .unwrap();
        repo.create(inside.clone()).await.unwrap();
        repo.create(outside).await.unwrap();

        let found = repo
            .find_pending_between(now, now + TimeDelta::minutes(60), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, inside.id);
    }

    #[tokio::test]
    async fn test_update_status_keeps_published_at_when_none() {
        let repo = InMemoryPostRepository::default();
        let post = repo
            .create(Post::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "Hello".into(),
                PostContent::default(),
            ))
            .await
            .unwrap();
        let at = Utc::now();

        repo.update_status(post.id, PostStatus::Published, Some(at))
            .await
            .unwrap();
        repo.update_status(post.id, PostStatus::Archived, None)
            .await
            .unwrap();

        let stored = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Archived);
        assert_eq!(stored.published_at, Some(at));
    }
}
