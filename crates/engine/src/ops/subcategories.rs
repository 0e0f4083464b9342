use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    CatalogEntry, EngineError, Page, PageRequest, ResultEngine, Subcategory, SubcategoryDetail,
    ValidationCode, ValidationError,
    catalog::search_key,
    categories, subcategories,
    util::{NormalizedName, contains_pattern, normalize_required_name, translate_unique_violation},
};

use super::{Engine, with_tx};

/// Partial update of a subcategory. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct SubcategoryPatch {
    /// Move the subcategory under another (active) category.
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for listing subcategories.
#[derive(Clone, Debug, Default)]
pub struct SubcategoryListFilter {
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on the name.
    pub search: Option<String>,
}

fn duplicate_in_category(name: &str, category: &categories::Model) -> ValidationError {
    ValidationError::new(
        "name",
        ValidationCode::DuplicateNameInCategory,
        format!(
            "subcategory '{name}' already exists in category '{}'",
            category.name
        ),
    )
}

fn not_found(id: i32) -> EngineError {
    EngineError::KeyNotFound(format!("subcategory {id}"))
}

async fn insert_subcategory(
    db_tx: &DatabaseTransaction,
    category_id: i32,
    name: &NormalizedName,
    is_active: bool,
) -> Result<subcategories::Model, DbErr> {
    let active = subcategories::ActiveModel {
        id: ActiveValue::NotSet,
        category_id: ActiveValue::Set(category_id),
        name: ActiveValue::Set(name.display.clone()),
        name_norm: ActiveValue::Set(name.key.clone()),
        created_at: ActiveValue::Set(Utc::now()),
        is_active: ActiveValue::Set(is_active),
    };
    active.insert(db_tx).await
}

fn detail(model: subcategories::Model, category: categories::Model) -> SubcategoryDetail {
    SubcategoryDetail {
        subcategory: Subcategory::from(model),
        category: CatalogEntry::from(category),
    }
}

impl Engine {
    /// Create a subcategory under an active category.
    ///
    /// The name is checked first, then the parent, then uniqueness within the
    /// parent. `is_active` sets the initial state of the new row.
    pub async fn create_subcategory(
        &self,
        category_id: i32,
        name: &str,
        is_active: bool,
    ) -> ResultEngine<SubcategoryDetail> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(name, "name")?;
            let category = Self::parent_category(&db_tx, category_id, true).await?;
            Self::ensure_unique_in_category(&db_tx, &name, &category, None).await?;

            let model = insert_subcategory(&db_tx, category.id, &name, is_active)
                .await
                .map_err(|err| {
                    translate_unique_violation(err, duplicate_in_category(&name.display, &category))
                })?;
            tracing::debug!(id = model.id, category_id, "subcategory created");
            Ok(detail(model, category))
        })
    }

    /// Rename, reparent or toggle a subcategory.
    ///
    /// Uniqueness is re-checked against the resulting category. The parent
    /// must be active only when it changes.
    pub async fn update_subcategory(
        &self,
        id: i32,
        patch: &SubcategoryPatch,
    ) -> ResultEngine<SubcategoryDetail> {
        with_tx!(self, |db_tx| {
            let current = subcategories::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;

            let name = match patch.name.as_deref() {
                Some(value) => normalize_required_name(value, "name")?,
                None => NormalizedName {
                    display: current.name.clone(),
                    key: current.name_norm.clone(),
                },
            };
            let category_id = patch.category_id.unwrap_or(current.category_id);
            let category_changed = category_id != current.category_id;
            let category = Self::parent_category(&db_tx, category_id, category_changed).await?;

            let name_changed = name.display != current.name;
            let is_active = patch.is_active.unwrap_or(current.is_active);
            if !name_changed && !category_changed && is_active == current.is_active {
                return Ok(detail(current, category));
            }
            if name_changed || category_changed {
                Self::ensure_unique_in_category(&db_tx, &name, &category, Some(id)).await?;
            }

            let mut active: subcategories::ActiveModel = current.into();
            active.category_id = ActiveValue::Set(category.id);
            active.name = ActiveValue::Set(name.display.clone());
            active.name_norm = ActiveValue::Set(name.key.clone());
            active.is_active = ActiveValue::Set(is_active);
            let model = active.update(&db_tx).await.map_err(|err| {
                translate_unique_violation(err, duplicate_in_category(&name.display, &category))
            })?;
            tracing::debug!(id, category_id, "subcategory updated");
            Ok(detail(model, category))
        })
    }

    /// Soft-delete a subcategory. Its category and records are left alone.
    pub async fn deactivate_subcategory(&self, id: i32) -> ResultEngine<SubcategoryDetail> {
        let patch = SubcategoryPatch {
            is_active: Some(false),
            ..SubcategoryPatch::default()
        };
        self.update_subcategory(id, &patch).await
    }

    pub async fn activate_subcategory(&self, id: i32) -> ResultEngine<SubcategoryDetail> {
        let patch = SubcategoryPatch {
            is_active: Some(true),
            ..SubcategoryPatch::default()
        };
        self.update_subcategory(id, &patch).await
    }

    pub async fn subcategory(&self, id: i32) -> ResultEngine<SubcategoryDetail> {
        with_tx!(self, |db_tx| {
            let (model, category) = subcategories::Entity::find_by_id(id)
                .find_also_related(categories::Entity)
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;
            let category = category.ok_or_else(|| {
                EngineError::KeyNotFound(format!("category {}", model.category_id))
            })?;
            Ok(detail(model, category))
        })
    }

    /// List subcategories ordered by category name, name and id.
    pub async fn list_subcategories(
        &self,
        filter: &SubcategoryListFilter,
        request: PageRequest,
    ) -> ResultEngine<Page<SubcategoryDetail>> {
        with_tx!(self, |db_tx| {
            let mut query = subcategories::Entity::find()
                .find_also_related(categories::Entity)
                .order_by_asc(categories::Column::Name)
                .order_by_asc(subcategories::Column::Name)
                .order_by_asc(subcategories::Column::Id);
            if let Some(category_id) = filter.category_id {
                query = query.filter(subcategories::Column::CategoryId.eq(category_id));
            }
            if let Some(is_active) = filter.is_active {
                query = query.filter(subcategories::Column::IsActive.eq(is_active));
            }
            if let Some(search) = filter.search.as_deref().map(search_key)
                && !search.is_empty()
            {
                query = query
                    .filter(subcategories::Column::NameNorm.like(contains_pattern(&search)));
            }

            let paginator = query.paginate(&db_tx, request.page_size);
            let total_count = paginator.num_items().await?;
            let rows = paginator.fetch_page(request.page - 1).await?;
            let mut items = Vec::with_capacity(rows.len());
            for (model, category) in rows {
                let category = category.ok_or_else(|| {
                    EngineError::KeyNotFound(format!("category {}", model.category_id))
                })?;
                items.push(detail(model, category));
            }

            Ok(Page {
                items,
                total_count,
                page: request.page,
                page_size: request.page_size,
            })
        })
    }

    /// Active subcategories of one category, ordered by name.
    ///
    /// Unknown or childless categories yield an empty list.
    pub async fn subcategories_by_category(
        &self,
        category_id: i32,
    ) -> ResultEngine<Vec<Subcategory>> {
        with_tx!(self, |db_tx| {
            let models = subcategories::Entity::find()
                .filter(subcategories::Column::CategoryId.eq(category_id))
                .filter(subcategories::Column::IsActive.eq(true))
                .order_by_asc(subcategories::Column::Name)
                .order_by_asc(subcategories::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Subcategory::from).collect())
        })
    }

    async fn parent_category(
        db_tx: &DatabaseTransaction,
        category_id: i32,
        require_active: bool,
    ) -> ResultEngine<categories::Model> {
        let category = categories::Entity::find_by_id(category_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                ValidationError::new(
                    "category_id",
                    ValidationCode::ReferenceNotFound,
                    format!("category {category_id} does not exist"),
                )
            })?;
        if require_active && !category.is_active {
            return Err(ValidationError::new(
                "category_id",
                ValidationCode::CategoryInactive,
                format!("category '{}' is inactive", category.name),
            )
            .into());
        }
        Ok(category)
    }

    async fn ensure_unique_in_category(
        db_tx: &DatabaseTransaction,
        name: &NormalizedName,
        category: &categories::Model,
        except_id: Option<i32>,
    ) -> ResultEngine<()> {
        let mut query = subcategories::Entity::find()
            .filter(subcategories::Column::CategoryId.eq(category.id))
            .filter(subcategories::Column::NameNorm.eq(name.key.as_str()));
        if let Some(id) = except_id {
            query = query.filter(subcategories::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(duplicate_in_category(&name.display, category).into());
        }
        Ok(())
    }
}
