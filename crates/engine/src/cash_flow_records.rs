//! Cash-flow records.
//!
//! A record is one money movement tagged with a status, a transaction type, a
//! category and a subcategory of that category. Records are never removed:
//! deleting one only clears `is_active`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Amount, CatalogEntry, Subcategory};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashFlowRecord {
    pub id: i32,
    pub status_id: i32,
    pub transaction_type_id: i32,
    pub category_id: i32,
    pub subcategory_id: i32,
    pub amount: Amount,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A record with every reference expanded, as shown by listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashFlowRecordDetail {
    pub record: CashFlowRecord,
    pub status: CatalogEntry,
    pub transaction_type: CatalogEntry,
    pub category: CatalogEntry,
    pub subcategory: Subcategory,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_flow_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub status_id: i32,
    pub transaction_type_id: i32,
    pub category_id: i32,
    pub subcategory_id: i32,
    pub amount_minor: i64,
    pub comment: String,
    /// Lowercased comment used by free-text search.
    pub comment_norm: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::statuses::Entity",
        from = "Column::StatusId",
        to = "super::statuses::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Statuses,
    #[sea_orm(
        belongs_to = "super::transaction_types::Entity",
        from = "Column::TransactionTypeId",
        to = "super::transaction_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    TransactionTypes,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Subcategories,
}

impl Related<super::statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statuses.def()
    }
}

impl Related<super::transaction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionTypes.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CashFlowRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            status_id: model.status_id,
            transaction_type_id: model.transaction_type_id,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            amount: Amount::from_minor(model.amount_minor),
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
            is_active: model.is_active,
        }
    }
}
