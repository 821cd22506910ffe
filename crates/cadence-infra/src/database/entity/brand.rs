//! Brand entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::Brand;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub voice: Option<String>,
    pub approver_contact: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Brand {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            voice: model.voice,
            approver_contact: model.approver_contact,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Brand> for ActiveModel {
    fn from(brand: Brand) -> Self {
        Self {
            id: Set(brand.id),
            tenant_id: Set(brand.tenant_id),
            name: Set(brand.name),
            voice: Set(brand.voice),
            approver_contact: Set(brand.approver_contact),
            created_at: Set(brand.created_at.into()),
            updated_at: Set(brand.updated_at.into()),
        }
    }
}
