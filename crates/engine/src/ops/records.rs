use std::collections::HashMap;

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{
    CashFlowRecord, CashFlowRecordDetail, CatalogEntry, EngineError, ResultEngine, Subcategory,
    cash_flow_records, catalog::CatalogStore, categories, statuses, subcategories,
    transaction_types,
};

mod candidate;
mod list;
mod write;

pub use candidate::{RecordCandidate, RecordPatch};
pub use list::{RecordFilter, RecordOrdering};

fn record_not_found(id: i32) -> EngineError {
    EngineError::KeyNotFound(format!("cash-flow record {id}"))
}

fn lookup<T: Clone>(map: &HashMap<i32, T>, label: &str, id: i32) -> ResultEngine<T> {
    map.get(&id)
        .cloned()
        .ok_or_else(|| EngineError::KeyNotFound(format!("{label} {id}")))
}

/// Attach every referenced catalog row to the given records.
///
/// References are loaded with one query per table, so a page costs a fixed
/// number of round trips.
pub(super) async fn expand_records(
    db_tx: &DatabaseTransaction,
    models: Vec<cash_flow_records::Model>,
) -> ResultEngine<Vec<CashFlowRecordDetail>> {
    let ids = |f: fn(&cash_flow_records::Model) -> i32| {
        let mut ids: Vec<i32> = models.iter().map(f).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };

    let statuses: HashMap<i32, CatalogEntry> =
        statuses::Entity::find_entries(db_tx, ids(|m| m.status_id)).await?;
    let transaction_types: HashMap<i32, CatalogEntry> =
        transaction_types::Entity::find_entries(db_tx, ids(|m| m.transaction_type_id)).await?;
    let categories: HashMap<i32, CatalogEntry> =
        categories::Entity::find_entries(db_tx, ids(|m| m.category_id)).await?;
    let subcategory_ids = ids(|m| m.subcategory_id);
    let subcategories: HashMap<i32, Subcategory> = if subcategory_ids.is_empty() {
        HashMap::new()
    } else {
        subcategories::Entity::find()
            .filter(subcategories::Column::Id.is_in(subcategory_ids))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|model| (model.id, Subcategory::from(model)))
            .collect()
    };

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let record = CashFlowRecord::from(model);
        out.push(CashFlowRecordDetail {
            status: lookup(&statuses, "status", record.status_id)?,
            transaction_type: lookup(
                &transaction_types,
                "transaction type",
                record.transaction_type_id,
            )?,
            category: lookup(&categories, "category", record.category_id)?,
            subcategory: lookup(&subcategories, "subcategory", record.subcategory_id)?,
            record,
        });
    }
    Ok(out)
}

/// Load and expand a single record, active or not.
pub(super) async fn record_detail(
    db_tx: &DatabaseTransaction,
    id: i32,
) -> ResultEngine<CashFlowRecordDetail> {
    let model = cash_flow_records::Entity::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| record_not_found(id))?;
    expand_records(db_tx, vec![model])
        .await?
        .pop()
        .ok_or_else(|| record_not_found(id))
}
