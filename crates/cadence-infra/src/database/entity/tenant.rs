//! Tenant entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::Tenant;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tenant {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Tenant> for ActiveModel {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: Set(tenant.id),
            name: Set(tenant.name),
            created_at: Set(tenant.created_at.into()),
        }
    }
}
