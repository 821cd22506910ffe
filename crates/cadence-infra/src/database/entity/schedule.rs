//! Schedule entity for SeaORM. `post_id` is unique: one schedule per post.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::Schedule;

use super::enums::ScheduleStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub run_at: DateTimeWithTimeZone,
    pub timezone: String,
    pub status: ScheduleStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Schedule {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            tenant_id: model.tenant_id,
            run_at: model.run_at.into(),
            timezone: model.timezone,
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Schedule> for ActiveModel {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: Set(schedule.id),
            post_id: Set(schedule.post_id),
            tenant_id: Set(schedule.tenant_id),
            run_at: Set(schedule.run_at.into()),
            timezone: Set(schedule.timezone),
            status: Set(schedule.status.into()),
            created_at: Set(schedule.created_at.into()),
            updated_at: Set(schedule.updated_at.into()),
        }
    }
}
