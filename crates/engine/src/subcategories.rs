//! Subcategories, scoped to a parent category.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::CatalogEntry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A subcategory together with its (expanded) parent category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryDetail {
    pub subcategory: Subcategory,
    pub category: CatalogEntry,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subcategories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub name_norm: String,
    pub created_at: DateTimeUtc,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Categories,
    #[sea_orm(has_many = "super::cash_flow_records::Entity")]
    CashFlowRecords,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::cash_flow_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlowRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Subcategory {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            created_at: model.created_at,
            is_active: model.is_active,
        }
    }
}
