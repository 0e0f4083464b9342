use chrono::Utc;
use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{
    CatalogEntry, CatalogKind, CatalogListFilter, EngineError, Page, PageRequest, ResultEngine,
    ValidationCode, ValidationError,
    catalog::CatalogStore,
    categories, statuses, transaction_types,
    util::{normalize_required_name, translate_unique_violation},
};

use super::{Engine, with_tx};

/// Partial update of a catalog entry. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct CatalogPatch {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Dispatch a generic catalog helper on the runtime [`CatalogKind`].
macro_rules! dispatch {
    ($kind:expr, $helper:ident($($arg:expr),*)) => {
        match $kind {
            CatalogKind::Status => $helper::<statuses::Entity>($($arg),*).await,
            CatalogKind::TransactionType => {
                $helper::<transaction_types::Entity>($($arg),*).await
            }
            CatalogKind::Category => $helper::<categories::Entity>($($arg),*).await,
        }
    };
}

fn duplicate_name<S: CatalogStore>(name: &str) -> ValidationError {
    ValidationError::new(
        "name",
        ValidationCode::DuplicateName,
        format!("{} '{name}' already exists", S::KIND.label()),
    )
}

fn not_found(kind: CatalogKind, id: i32) -> EngineError {
    EngineError::KeyNotFound(format!("{} {id}", kind.label()))
}

async fn create<S: CatalogStore>(
    db_tx: &DatabaseTransaction,
    name: &str,
    is_active: bool,
) -> ResultEngine<CatalogEntry> {
    let name = normalize_required_name(name, "name")?;
    if S::name_taken(db_tx, &name.key, None).await? {
        return Err(duplicate_name::<S>(&name.display).into());
    }
    let conflict = duplicate_name::<S>(&name.display);
    let entry = S::insert_entry(db_tx, name.display, name.key, Utc::now(), is_active)
        .await
        .map_err(|err| translate_unique_violation(err, conflict))?;
    tracing::debug!(kind = S::KIND.as_str(), id = entry.id, "catalog entry created");
    Ok(entry)
}

async fn update<S: CatalogStore>(
    db_tx: &DatabaseTransaction,
    id: i32,
    patch: &CatalogPatch,
) -> ResultEngine<CatalogEntry> {
    let current = S::find_entry(db_tx, id)
        .await?
        .ok_or_else(|| not_found(S::KIND, id))?;

    let name = match patch.name.as_deref() {
        Some(value) => {
            let name = normalize_required_name(value, "name")?;
            if S::name_taken(db_tx, &name.key, Some(id)).await? {
                return Err(duplicate_name::<S>(&name.display).into());
            }
            (name.display != current.name).then_some((name.display, name.key))
        }
        None => None,
    };
    let is_active = patch.is_active.filter(|flag| *flag != current.is_active);
    if name.is_none() && is_active.is_none() {
        return Ok(current);
    }

    let conflict = duplicate_name::<S>(
        name.as_ref()
            .map_or(current.name.as_str(), |(display, _)| display.as_str()),
    );
    let entry = S::update_entry(db_tx, id, name, is_active)
        .await
        .map_err(|err| translate_unique_violation(err, conflict))?;
    tracing::debug!(kind = S::KIND.as_str(), id, "catalog entry updated");
    Ok(entry)
}

async fn find<S: CatalogStore>(db_tx: &DatabaseTransaction, id: i32) -> ResultEngine<CatalogEntry> {
    S::find_entry(db_tx, id)
        .await?
        .ok_or_else(|| not_found(S::KIND, id))
}

async fn page<S: CatalogStore>(
    db_tx: &DatabaseTransaction,
    filter: &CatalogListFilter,
    request: PageRequest,
) -> ResultEngine<Page<CatalogEntry>> {
    S::page_entries(db_tx, filter, request).await
}

async fn active<S: CatalogStore>(db_tx: &DatabaseTransaction) -> ResultEngine<Vec<CatalogEntry>> {
    S::active_entries(db_tx).await
}

impl Engine {
    /// Create a new entry in the `kind` catalog, active or not.
    ///
    /// Names are compared case-insensitively against every row, active or
    /// not.
    pub async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        is_active: bool,
    ) -> ResultEngine<CatalogEntry> {
        with_tx!(self, |db_tx| dispatch!(kind, create(&db_tx, name, is_active)))
    }

    pub async fn rename_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
        name: &str,
    ) -> ResultEngine<CatalogEntry> {
        let patch = CatalogPatch {
            name: Some(name.to_string()),
            is_active: None,
        };
        self.update_catalog_entry(kind, id, &patch).await
    }

    /// Apply a rename and/or an activity change in one transaction.
    pub async fn update_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
        patch: &CatalogPatch,
    ) -> ResultEngine<CatalogEntry> {
        with_tx!(self, |db_tx| dispatch!(kind, update(&db_tx, id, patch)))
    }

    /// Soft-delete an entry. Deactivating an inactive entry is a no-op.
    pub async fn deactivate_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
    ) -> ResultEngine<CatalogEntry> {
        let patch = CatalogPatch {
            name: None,
            is_active: Some(false),
        };
        self.update_catalog_entry(kind, id, &patch).await
    }

    pub async fn activate_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
    ) -> ResultEngine<CatalogEntry> {
        let patch = CatalogPatch {
            name: None,
            is_active: Some(true),
        };
        self.update_catalog_entry(kind, id, &patch).await
    }

    pub async fn catalog_entry(&self, kind: CatalogKind, id: i32) -> ResultEngine<CatalogEntry> {
        with_tx!(self, |db_tx| dispatch!(kind, find(&db_tx, id)))
    }

    /// List entries ordered by name, then id.
    pub async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
        filter: &CatalogListFilter,
        request: PageRequest,
    ) -> ResultEngine<Page<CatalogEntry>> {
        with_tx!(self, |db_tx| dispatch!(kind, page(&db_tx, filter, request)))
    }

    /// Entries that may be picked for a new or edited record.
    pub async fn active_catalog_entries(
        &self,
        kind: CatalogKind,
    ) -> ResultEngine<Vec<CatalogEntry>> {
        with_tx!(self, |db_tx| dispatch!(kind, active(&db_tx)))
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;

    #[tokio::test]
    async fn store_unique_violation_becomes_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let db_tx = db.begin().await.unwrap();

        categories::Entity::insert_entry(
            &db_tx,
            "Marketing".to_string(),
            "marketing".to_string(),
            Utc::now(),
            true,
        )
        .await
        .unwrap();
        // Skips the pre-check, so only the unique index can reject the row.
        let err = categories::Entity::insert_entry(
            &db_tx,
            "MARKETING".to_string(),
            "marketing".to_string(),
            Utc::now(),
            true,
        )
        .await
        .map_err(|err| {
            translate_unique_violation(err, duplicate_name::<categories::Entity>("MARKETING"))
        })
        .unwrap_err();

        match err {
            EngineError::ConstraintConflict(conflict) => {
                assert_eq!(conflict.code, ValidationCode::DuplicateName);
                assert_eq!(conflict.field, "name");
            }
            other => panic!("expected a constraint conflict, got {other:?}"),
        }
    }
}
