//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use cadence_core::domain::{
    ApprovalLog, Brand, Post, PostAnalytics, PostStatus, Schedule, ScheduleStatus, User,
};
use cadence_core::error::RepoError;
use cadence_core::ports::{
    AnalyticsRepository, ApprovalLogRepository, BrandRepository, PostRepository,
    ScheduleRepository, StatusCount, TenantRepository, UserRepository,
};

use super::entity::approval_log::{self, Entity as ApprovalLogEntity};
use super::entity::brand::{self, Entity as BrandEntity};
use super::entity::enums;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_analytics::{self, Entity as AnalyticsEntity};
use super::entity::schedule::{self, Entity as ScheduleEntity};
use super::entity::tenant::Entity as TenantEntity;
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{map_db_err, PostgresBaseRepository};

pub type PostgresTenantRepository = PostgresBaseRepository<TenantEntity>;
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;
pub type PostgresBrandRepository = PostgresBaseRepository<BrandEntity>;
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;
pub type PostgresScheduleRepository = PostgresBaseRepository<ScheduleEntity>;
pub type PostgresAnalyticsRepository = PostgresBaseRepository<AnalyticsEntity>;
pub type PostgresApprovalLogRepository = PostgresBaseRepository<ApprovalLogEntity>;

fn timestamp(at: DateTime<Utc>) -> DateTimeWithTimeZone {
    at.into()
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            },
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl BrandRepository for PostgresBrandRepository {
    async fn find_for_tenant(
        &self,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<Brand>, RepoError> {
        let result = BrandEntity::find_by_id(id)
            .filter(brand::Column::TenantId.eq(tenant_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Brand>, RepoError> {
        let result = BrandEntity::find()
            .filter(brand::Column::TenantId.eq(tenant_id))
            .order_by_asc(brand::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_for_tenant(&self, id: Uuid, tenant_id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::TenantId.eq(tenant_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::TenantId.eq(tenant_id));
        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(enums::PostStatus::from(status)));
        }

        let result = query
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published_for_brand(
        &self,
        tenant_id: Uuid,
        brand_id: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::TenantId.eq(tenant_id))
            .filter(post::Column::BrandId.eq(brand_id))
            .filter(post::Column::Status.eq(enums::PostStatus::Published))
            .order_by_desc(post::Column::PublishedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepoError> {
        let mut update = PostEntity::update_many()
            .col_expr(
                post::Column::Status,
                Expr::value(enums::PostStatus::from(status)),
            )
            .col_expr(post::Column::UpdatedAt, Expr::value(timestamp(Utc::now())));
        if let Some(at) = published_at {
            update = update.col_expr(post::Column::PublishedAt, Expr::value(timestamp(at)));
        }

        let result = update
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_by_status(&self, tenant_id: Uuid) -> Result<Vec<StatusCount>, RepoError> {
        let rows: Vec<(enums::PostStatus, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::Status)
            .column_as(Expr::col(post::Column::Id).count(), "count")
            .filter(post::Column::TenantId.eq(tenant_id))
            .group_by(post::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: status.into(),
                count: count.max(0) as u64,
            })
            .collect())
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Option<Schedule>, RepoError> {
        let result = ScheduleEntity::find()
            .filter(schedule::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_status(&self, id: Uuid, status: ScheduleStatus) -> Result<(), RepoError> {
        let result = ScheduleEntity::update_many()
            .col_expr(
                schedule::Column::Status,
                Expr::value(enums::ScheduleStatus::from(status)),
            )
            .col_expr(
                schedule::Column::UpdatedAt,
                Expr::value(timestamp(Utc::now())),
            )
            .filter(schedule::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        let mut query = ScheduleEntity::find()
            .filter(schedule::Column::Status.eq(enums::ScheduleStatus::Pending))
            .filter(schedule::Column::RunAt.lte(timestamp(now)));
        if let Some(tenant_id) = tenant_id {
            query = query.filter(schedule::Column::TenantId.eq(tenant_id));
        }

        let result = query
            .order_by_asc(schedule::Column::RunAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_pending_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Schedule>, RepoError> {
        let mut query = ScheduleEntity::find()
            .filter(schedule::Column::Status.eq(enums::ScheduleStatus::Pending))
            .filter(schedule::Column::RunAt.gte(timestamp(from)))
            .filter(schedule::Column::RunAt.lte(timestamp(to)));
        if let Some(tenant_id) = tenant_id {
            query = query.filter(schedule::Column::TenantId.eq(tenant_id));
        }

        let result = query
            .order_by_asc(schedule::Column::RunAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_pending(&self, tenant_id: Uuid) -> Result<u64, RepoError> {
        ScheduleEntity::find()
            .filter(schedule::Column::TenantId.eq(tenant_id))
            .filter(schedule::Column::Status.eq(enums::ScheduleStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl AnalyticsRepository for PostgresAnalyticsRepository {
    async fn append(&self, record: PostAnalytics) -> Result<PostAnalytics, RepoError> {
        let active_model: post_analytics::ActiveModel = record.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostAnalytics>, RepoError> {
        let result = AnalyticsEntity::find()
            .filter(post_analytics::Column::PostId.eq(post_id))
            .order_by_asc(post_analytics::Column::RecordedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ApprovalLogRepository for PostgresApprovalLogRepository {
    async fn append(&self, log: ApprovalLog) -> Result<ApprovalLog, RepoError> {
        let active_model: approval_log::ActiveModel = log.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<ApprovalLog>, RepoError> {
        let result = ApprovalLogEntity::find()
            .filter(approval_log::Column::PostId.eq(post_id))
            .order_by_asc(approval_log::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
