use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    Amount, CashFlowRecord, CashFlowRecordDetail, CatalogEntry, ResultEngine, Subcategory,
    ValidationCode, ValidationError, cash_flow_records,
    catalog::{CatalogStore, search_key},
    categories, statuses, subcategories, transaction_types,
};

use super::super::{Engine, with_tx};
use super::{RecordCandidate, RecordPatch, record_detail, record_not_found};

/// The four references of a record, by id.
#[derive(Clone, Copy, Debug)]
struct ReferenceIds {
    status_id: i32,
    transaction_type_id: i32,
    category_id: i32,
    subcategory_id: i32,
}

/// Which references must be active. A reference is only required to be
/// active when it is being selected.
#[derive(Clone, Copy, Debug)]
struct Selection {
    status: bool,
    transaction_type: bool,
    category: bool,
    subcategory: bool,
}

impl Selection {
    fn all() -> Self {
        Self {
            status: true,
            transaction_type: true,
            category: true,
            subcategory: true,
        }
    }

    fn changed(current: &cash_flow_records::Model, merged: ReferenceIds) -> Self {
        Self {
            status: merged.status_id != current.status_id,
            transaction_type: merged.transaction_type_id != current.transaction_type_id,
            category: merged.category_id != current.category_id,
            subcategory: merged.subcategory_id != current.subcategory_id,
        }
    }
}

struct References {
    status: CatalogEntry,
    transaction_type: CatalogEntry,
    category: CatalogEntry,
    subcategory: Subcategory,
}

impl References {
    fn into_detail(self, record: CashFlowRecord) -> CashFlowRecordDetail {
        CashFlowRecordDetail {
            record,
            status: self.status,
            transaction_type: self.transaction_type,
            category: self.category,
            subcategory: self.subcategory,
        }
    }
}

fn ensure_positive(amount: Amount) -> Result<(), ValidationError> {
    if amount.is_positive() {
        return Ok(());
    }
    Err(ValidationError::new(
        "amount",
        ValidationCode::AmountNotPositive,
        "amount must be greater than zero",
    ))
}

fn normalize_comment(comment: Option<&str>) -> String {
    comment.map(str::trim).unwrap_or_default().to_string()
}

async fn resolve_catalog<S: CatalogStore>(
    db_tx: &DatabaseTransaction,
    id: i32,
    require_active: bool,
) -> ResultEngine<CatalogEntry> {
    let field = S::KIND.reference_field();
    let entry = S::find_entry(db_tx, id).await?.ok_or_else(|| {
        ValidationError::new(
            field,
            ValidationCode::ReferenceNotFound,
            format!("{} {id} does not exist", S::KIND.label()),
        )
    })?;
    if require_active && !entry.is_active {
        return Err(ValidationError::new(
            field,
            ValidationCode::ReferenceInactive,
            format!("{} '{}' is inactive", S::KIND.label(), entry.name),
        )
        .into());
    }
    Ok(entry)
}

/// Resolve the references in validation order, then check that the
/// subcategory belongs to the category.
async fn resolve_references(
    db_tx: &DatabaseTransaction,
    ids: ReferenceIds,
    selection: Selection,
) -> ResultEngine<References> {
    let status =
        resolve_catalog::<statuses::Entity>(db_tx, ids.status_id, selection.status).await?;
    let transaction_type = resolve_catalog::<transaction_types::Entity>(
        db_tx,
        ids.transaction_type_id,
        selection.transaction_type,
    )
    .await?;
    let category =
        resolve_catalog::<categories::Entity>(db_tx, ids.category_id, selection.category).await?;

    let subcategory = subcategories::Entity::find_by_id(ids.subcategory_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| {
            ValidationError::new(
                "subcategory_id",
                ValidationCode::ReferenceNotFound,
                format!("subcategory {} does not exist", ids.subcategory_id),
            )
        })?;
    if selection.subcategory && !subcategory.is_active {
        return Err(ValidationError::new(
            "subcategory_id",
            ValidationCode::ReferenceInactive,
            format!("subcategory '{}' is inactive", subcategory.name),
        )
        .into());
    }
    if subcategory.category_id != category.id {
        return Err(ValidationError::new(
            "subcategory_id",
            ValidationCode::SubcategoryCategoryMismatch,
            format!(
                "subcategory '{}' does not belong to category '{}'",
                subcategory.name, category.name
            ),
        )
        .into());
    }

    Ok(References {
        status,
        transaction_type,
        category,
        subcategory: Subcategory::from(subcategory),
    })
}

impl Engine {
    /// Validate and store a new cash-flow record.
    ///
    /// Checks run in a fixed order and stop at the first failure: amount,
    /// then status, transaction type, category and subcategory (existence and
    /// activity), then the subcategory/category pairing.
    pub async fn submit_record(
        &self,
        candidate: &RecordCandidate,
    ) -> ResultEngine<CashFlowRecordDetail> {
        with_tx!(self, |db_tx| {
            ensure_positive(candidate.amount)?;
            let ids = ReferenceIds {
                status_id: candidate.status_id,
                transaction_type_id: candidate.transaction_type_id,
                category_id: candidate.category_id,
                subcategory_id: candidate.subcategory_id,
            };
            let references = resolve_references(&db_tx, ids, Selection::all()).await?;

            let comment = normalize_comment(candidate.comment.as_deref());
            let now = Utc::now();
            let active = cash_flow_records::ActiveModel {
                id: ActiveValue::NotSet,
                status_id: ActiveValue::Set(ids.status_id),
                transaction_type_id: ActiveValue::Set(ids.transaction_type_id),
                category_id: ActiveValue::Set(ids.category_id),
                subcategory_id: ActiveValue::Set(ids.subcategory_id),
                amount_minor: ActiveValue::Set(candidate.amount.minor()),
                comment_norm: ActiveValue::Set(search_key(&comment)),
                comment: ActiveValue::Set(comment),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                is_active: ActiveValue::Set(true),
            };
            let model = active.insert(&db_tx).await?;
            tracing::debug!(id = model.id, amount = %candidate.amount, "cash-flow record created");
            Ok(references.into_detail(CashFlowRecord::from(model)))
        })
    }

    /// Apply a patch to a record and re-validate the merged state.
    ///
    /// References left unchanged only need to exist; a reference that the
    /// patch changes must also be active. The subcategory/category pairing
    /// is always checked.
    pub async fn update_record(
        &self,
        id: i32,
        patch: &RecordPatch,
    ) -> ResultEngine<CashFlowRecordDetail> {
        with_tx!(self, |db_tx| {
            let current = cash_flow_records::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| record_not_found(id))?;

            let amount = patch
                .amount
                .unwrap_or_else(|| Amount::from_minor(current.amount_minor));
            ensure_positive(amount)?;
            let ids = ReferenceIds {
                status_id: patch.status_id.unwrap_or(current.status_id),
                transaction_type_id: patch
                    .transaction_type_id
                    .unwrap_or(current.transaction_type_id),
                category_id: patch.category_id.unwrap_or(current.category_id),
                subcategory_id: patch.subcategory_id.unwrap_or(current.subcategory_id),
            };
            let selection = Selection::changed(&current, ids);
            let references = resolve_references(&db_tx, ids, selection).await?;

            let comment = match patch.comment.as_deref() {
                Some(comment) => normalize_comment(Some(comment)),
                None => current.comment.clone(),
            };
            let mut active: cash_flow_records::ActiveModel = current.into();
            active.status_id = ActiveValue::Set(ids.status_id);
            active.transaction_type_id = ActiveValue::Set(ids.transaction_type_id);
            active.category_id = ActiveValue::Set(ids.category_id);
            active.subcategory_id = ActiveValue::Set(ids.subcategory_id);
            active.amount_minor = ActiveValue::Set(amount.minor());
            active.comment_norm = ActiveValue::Set(search_key(&comment));
            active.comment = ActiveValue::Set(comment);
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            tracing::debug!(id, "cash-flow record updated");
            Ok(references.into_detail(CashFlowRecord::from(model)))
        })
    }

    /// Hide a record from default listings. Deleting twice is a no-op.
    pub async fn soft_delete_record(&self, id: i32) -> ResultEngine<CashFlowRecordDetail> {
        self.set_record_active(id, false).await
    }

    /// Bring a soft-deleted record back.
    pub async fn restore_record(&self, id: i32) -> ResultEngine<CashFlowRecordDetail> {
        self.set_record_active(id, true).await
    }

    /// Fetch one record with expanded references, whether active or not.
    pub async fn record(&self, id: i32) -> ResultEngine<CashFlowRecordDetail> {
        with_tx!(self, |db_tx| record_detail(&db_tx, id).await)
    }

    async fn set_record_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> ResultEngine<CashFlowRecordDetail> {
        with_tx!(self, |db_tx| {
            let current = cash_flow_records::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| record_not_found(id))?;
            if current.is_active != is_active {
                let mut active: cash_flow_records::ActiveModel = current.into();
                active.is_active = ActiveValue::Set(is_active);
                active.updated_at = ActiveValue::Set(Utc::now());
                active.update(&db_tx).await?;
                tracing::debug!(id, is_active, "cash-flow record activity changed");
            }
            record_detail(&db_tx, id).await
        })
    }
}
