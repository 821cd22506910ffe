//! Approval log entity for SeaORM. Rows are only ever inserted.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::ApprovalLog;

use super::enums::ApprovalAction;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "approval_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub tenant_id: Uuid,
    pub action: ApprovalAction,
    pub actor_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
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

impl From<Model> for ApprovalLog {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            tenant_id: model.tenant_id,
            action: model.action.into(),
            actor_id: model.actor_id,
            feedback: model.feedback,
            metadata: model.metadata,
            created_at: model.created_at.into(),
        }
    }
}

impl From<ApprovalLog> for ActiveModel {
    fn from(log: ApprovalLog) -> Self {
        Self {
            id: Set(log.id),
            post_id: Set(log.post_id),
            tenant_id: Set(log.tenant_id),
            action: Set(log.action.into()),
            actor_id: Set(log.actor_id),
            feedback: Set(log.feedback),
            metadata: Set(log.metadata),
            created_at: Set(log.created_at.into()),
        }
    }
}
