//! Analytics entity for SeaORM. Rows are only ever inserted.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::{EngagementMetrics, PostAnalytics};

use super::enums::Platform;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub platform: Platform,
    pub impressions: i64,
    pub engagement: i64,
    pub clicks: i64,
    pub shares: i64,
    pub comments: i64,
    pub likes: i64,
    pub recorded_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PostAnalytics {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            tenant_id: model.tenant_id,
            platform: model.platform.into(),
            metrics: EngagementMetrics {
                impressions: model.impressions,
                engagement: model.engagement,
                clicks: model.clicks,
                shares: model.shares,
                comments: model.comments,
                likes: model.likes,
            },
            recorded_at: model.recorded_at.into(),
            metadata: model.metadata,
        }
    }
}

impl From<PostAnalytics> for ActiveModel {
    fn from(record: PostAnalytics) -> Self {
        let m = record.metrics;
        Self {
            id: Set(record.id),
            post_id: Set(record.post_id),
            tenant_id: Set(record.tenant_id),
            platform: Set(record.platform.into()),
            impressions: Set(m.impressions),
            engagement: Set(m.engagement),
            clicks: Set(m.clicks),
            shares: Set(m.shares),
            comments: Set(m.comments),
            likes: Set(m.likes),
            recorded_at: Set(record.recorded_at.into()),
            metadata: Set(record.metadata),
        }
    }
}
