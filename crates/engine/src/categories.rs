//! Category registry (infrastructure, marketing, ...).
//!
//! Categories own their subcategories: a subcategory always points to exactly
//! one category and its name is unique only within that category.

use sea_orm::entity::prelude::*;

use crate::CatalogEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_norm: String,
    pub created_at: DateTimeUtc,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subcategories::Entity")]
    Subcategories,
    #[sea_orm(has_many = "super::cash_flow_records::Entity")]
    CashFlowRecords,
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl Related<super::cash_flow_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlowRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CatalogEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            is_active: model.is_active,
        }
    }
}
