//! Flat reference catalogs: statuses, transaction types and categories.
//!
//! The three catalogs share one shape (`id`, `name`, `created_at`,
//! `is_active`) but live in separate tables. [`CatalogStore`] is the storage
//! seam: the engine writes its validation once, generic over the store, and
//! each table provides the queries.

use std::{collections::HashMap, future::Future};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    Page, PageRequest, ResultEngine, categories, statuses, transaction_types,
    util::{contains_pattern, normalize_display, normalize_key},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Status,
    TransactionType,
    Category,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::TransactionType => "transaction_type",
            Self::Category => "category",
        }
    }

    /// Human readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::TransactionType => "transaction type",
            Self::Category => "category",
        }
    }

    /// Field of a cash-flow record that references this catalog.
    pub fn reference_field(self) -> &'static str {
        match self {
            Self::Status => "status_id",
            Self::TransactionType => "transaction_type_id",
            Self::Category => "category_id",
        }
    }
}

impl TryFrom<&str> for CatalogKind {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "status" => Ok(Self::Status),
            "transaction_type" => Ok(Self::TransactionType),
            "category" => Ok(Self::Category),
            other => Err(format!("invalid catalog kind: {other}")),
        }
    }
}

/// A row of any flat catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Filters for listing catalog entries.
#[derive(Clone, Debug, Default)]
pub struct CatalogListFilter {
    /// If present, only rows with this activity flag are returned.
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
}

/// Storage operations of one catalog table.
pub(crate) trait CatalogStore {
    const KIND: CatalogKind;

    fn find_entry(
        db: &DatabaseTransaction,
        id: i32,
    ) -> impl Future<Output = ResultEngine<Option<CatalogEntry>>> + Send;

    fn find_entries(
        db: &DatabaseTransaction,
        ids: Vec<i32>,
    ) -> impl Future<Output = ResultEngine<HashMap<i32, CatalogEntry>>> + Send;

    /// Whether another row already uses `name_norm`.
    fn name_taken(
        db: &DatabaseTransaction,
        name_norm: &str,
        except_id: Option<i32>,
    ) -> impl Future<Output = ResultEngine<bool>> + Send;

    fn insert_entry(
        db: &DatabaseTransaction,
        name: String,
        name_norm: String,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> impl Future<Output = Result<CatalogEntry, DbErr>> + Send;

    fn update_entry(
        db: &DatabaseTransaction,
        id: i32,
        name: Option<(String, String)>,
        is_active: Option<bool>,
    ) -> impl Future<Output = Result<CatalogEntry, DbErr>> + Send;

    fn page_entries(
        db: &DatabaseTransaction,
        filter: &CatalogListFilter,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<CatalogEntry>>> + Send;

    fn active_entries(
        db: &DatabaseTransaction,
    ) -> impl Future<Output = ResultEngine<Vec<CatalogEntry>>> + Send;
}

/// Normalize a free-text search term the same way names are keyed.
pub(crate) fn search_key(input: &str) -> String {
    normalize_key(&normalize_display(input))
}

/// Implement [`CatalogStore`] for a catalog entity module.
///
/// Every catalog module exposes the same columns, so the queries are spelled
/// once and expanded per table.
macro_rules! catalog_store {
    ($table:ident, $kind:expr) => {
        impl CatalogStore for $table::Entity {
            const KIND: CatalogKind = $kind;

            async fn find_entry(
                db: &DatabaseTransaction,
                id: i32,
            ) -> ResultEngine<Option<CatalogEntry>> {
                Ok($table::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .map(CatalogEntry::from))
            }

            async fn find_entries(
                db: &DatabaseTransaction,
                ids: Vec<i32>,
            ) -> ResultEngine<HashMap<i32, CatalogEntry>> {
                if ids.is_empty() {
                    return Ok(HashMap::new());
                }
                let models = $table::Entity::find()
                    .filter($table::Column::Id.is_in(ids))
                    .all(db)
                    .await?;
                Ok(models
                    .into_iter()
                    .map(|model| (model.id, CatalogEntry::from(model)))
                    .collect())
            }

            async fn name_taken(
                db: &DatabaseTransaction,
                name_norm: &str,
                except_id: Option<i32>,
            ) -> ResultEngine<bool> {
                let mut query =
                    $table::Entity::find().filter($table::Column::NameNorm.eq(name_norm));
                if let Some(id) = except_id {
                    query = query.filter($table::Column::Id.ne(id));
                }
                Ok(query.one(db).await?.is_some())
            }

            async fn insert_entry(
                db: &DatabaseTransaction,
                name: String,
                name_norm: String,
                created_at: DateTime<Utc>,
                is_active: bool,
            ) -> Result<CatalogEntry, DbErr> {
                let active = $table::ActiveModel {
                    id: ActiveValue::NotSet,
                    name: ActiveValue::Set(name),
                    name_norm: ActiveValue::Set(name_norm),
                    created_at: ActiveValue::Set(created_at),
                    is_active: ActiveValue::Set(is_active),
                };
                Ok(CatalogEntry::from(active.insert(db).await?))
            }

            async fn update_entry(
                db: &DatabaseTransaction,
                id: i32,
                name: Option<(String, String)>,
                is_active: Option<bool>,
            ) -> Result<CatalogEntry, DbErr> {
                let mut active = $table::ActiveModel {
                    id: ActiveValue::Unchanged(id),
                    ..Default::default()
                };
                let mut changed = false;
                if let Some((display, key)) = name {
                    active.name = ActiveValue::Set(display);
                    active.name_norm = ActiveValue::Set(key);
                    changed = true;
                }
                if let Some(is_active) = is_active {
                    active.is_active = ActiveValue::Set(is_active);
                    changed = true;
                }
                if !changed {
                    return $table::Entity::find_by_id(id)
                        .one(db)
                        .await?
                        .map(CatalogEntry::from)
                        .ok_or_else(|| DbErr::RecordNotFound(format!("{} {id}", $kind.label())));
                }
                Ok(CatalogEntry::from(active.update(db).await?))
            }

            async fn page_entries(
                db: &DatabaseTransaction,
                filter: &CatalogListFilter,
                request: PageRequest,
            ) -> ResultEngine<Page<CatalogEntry>> {
                let mut query = $table::Entity::find()
                    .order_by_asc($table::Column::Name)
                    .order_by_asc($table::Column::Id);
                if let Some(is_active) = filter.is_active {
                    query = query.filter($table::Column::IsActive.eq(is_active));
                }
                if let Some(search) = filter.search.as_deref().map(search_key)
                    && !search.is_empty()
                {
                    query = query
                        .filter($table::Column::NameNorm.like(contains_pattern(&search)));
                }

                let paginator = query.paginate(db, request.page_size);
                let total_count = paginator.num_items().await?;
                let items = paginator
                    .fetch_page(request.page - 1)
                    .await?
                    .into_iter()
                    .map(CatalogEntry::from)
                    .collect();

                Ok(Page {
                    items,
                    total_count,
                    page: request.page,
                    page_size: request.page_size,
                })
            }

            async fn active_entries(db: &DatabaseTransaction) -> ResultEngine<Vec<CatalogEntry>> {
                let models = $table::Entity::find()
                    .filter($table::Column::IsActive.eq(true))
                    .order_by_asc($table::Column::Name)
                    .order_by_asc($table::Column::Id)
                    .all(db)
                    .await?;
                Ok(models.into_iter().map(CatalogEntry::from).collect())
            }
        }
    };
}

catalog_store!(statuses, CatalogKind::Status);
catalog_store!(transaction_types, CatalogKind::TransactionType);
catalog_store!(categories, CatalogKind::Category);
