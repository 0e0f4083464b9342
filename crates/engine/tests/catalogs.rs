use engine::{CatalogKind, CatalogListFilter, CatalogPatch, EngineError, PageRequest, ValidationCode};

mod common;

use common::engine_with_db;

const FIRST_PAGE: PageRequest = PageRequest {
    page: 1,
    page_size: 20,
};

#[tokio::test]
async fn create_normalizes_whitespace() {
    let (engine, _db) = engine_with_db().await;

    let entry = engine
        .create_catalog_entry(CatalogKind::Status, "  Personal   spending ", true)
        .await
        .unwrap();
    assert_eq!(entry.name, "Personal spending");
    assert!(entry.is_active);

    let fetched = engine
        .catalog_entry(CatalogKind::Status, entry.id)
        .await
        .unwrap();
    assert_eq!(fetched, entry);
}

#[tokio::test]
async fn create_can_start_inactive() {
    let (engine, _db) = engine_with_db().await;

    let entry = engine
        .create_catalog_entry(CatalogKind::Status, "Archived", false)
        .await
        .unwrap();
    assert!(!entry.is_active);

    let fetched = engine
        .catalog_entry(CatalogKind::Status, entry.id)
        .await
        .unwrap();
    assert!(!fetched.is_active);
    let choices = engine
        .active_catalog_entries(CatalogKind::Status)
        .await
        .unwrap();
    assert!(choices.is_empty());
}

#[tokio::test]
async fn duplicate_names_are_rejected_case_insensitively() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_catalog_entry(CatalogKind::Category, "Marketing", true)
        .await
        .unwrap();
    let err = engine
        .create_catalog_entry(CatalogKind::Category, "  MARKETING", true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::DuplicateName));
    assert_eq!(err.validation().unwrap().field, "name");
}

#[tokio::test]
async fn inactive_entries_still_reserve_their_name() {
    let (engine, _db) = engine_with_db().await;

    let taxes = engine
        .create_catalog_entry(CatalogKind::Status, "Taxes", true)
        .await
        .unwrap();
    engine
        .deactivate_catalog_entry(CatalogKind::Status, taxes.id)
        .await
        .unwrap();

    let err = engine
        .create_catalog_entry(CatalogKind::Status, "taxes", true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::DuplicateName));
}

#[tokio::test]
async fn catalogs_do_not_share_names() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_catalog_entry(CatalogKind::Status, "Other", true)
        .await
        .unwrap();
    engine
        .create_catalog_entry(CatalogKind::TransactionType, "Other", true)
        .await
        .unwrap();
    engine
        .create_catalog_entry(CatalogKind::Category, "Other", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn name_shape_is_validated() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_catalog_entry(CatalogKind::TransactionType, "   ", true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::EmptyName));

    let err = engine
        .create_catalog_entry(CatalogKind::TransactionType, &"x".repeat(101), true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::NameTooLong));
}

#[tokio::test]
async fn rename_checks_other_rows_only() {
    let (engine, _db) = engine_with_db().await;

    let income = engine
        .create_catalog_entry(CatalogKind::TransactionType, "Income", true)
        .await
        .unwrap();
    engine
        .create_catalog_entry(CatalogKind::TransactionType, "Expense", true)
        .await
        .unwrap();

    let renamed = engine
        .rename_catalog_entry(CatalogKind::TransactionType, income.id, "INCOME")
        .await
        .unwrap();
    assert_eq!(renamed.name, "INCOME");
    assert_eq!(renamed.created_at, income.created_at);

    let err = engine
        .rename_catalog_entry(CatalogKind::TransactionType, income.id, "expense")
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::DuplicateName));
}

#[tokio::test]
async fn deactivate_and_activate_are_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let status = engine
        .create_catalog_entry(CatalogKind::Status, "Business", true)
        .await
        .unwrap();

    let once = engine
        .deactivate_catalog_entry(CatalogKind::Status, status.id)
        .await
        .unwrap();
    let twice = engine
        .deactivate_catalog_entry(CatalogKind::Status, status.id)
        .await
        .unwrap();
    assert!(!once.is_active);
    assert_eq!(once, twice);

    let active = engine
        .activate_catalog_entry(CatalogKind::Status, status.id)
        .await
        .unwrap();
    let again = engine
        .activate_catalog_entry(CatalogKind::Status, status.id)
        .await
        .unwrap();
    assert!(active.is_active);
    assert_eq!(active, again);
    assert_eq!(active.name, status.name);
}

#[tokio::test]
async fn update_applies_name_and_flag_together() {
    let (engine, _db) = engine_with_db().await;

    let category = engine
        .create_catalog_entry(CatalogKind::Category, "Infra", true)
        .await
        .unwrap();
    let patch = CatalogPatch {
        name: Some("Infrastructure".to_string()),
        is_active: Some(false),
    };
    let updated = engine
        .update_catalog_entry(CatalogKind::Category, category.id, &patch)
        .await
        .unwrap();
    assert_eq!(updated.name, "Infrastructure");
    assert!(!updated.is_active);

    // A failing rename leaves the flag untouched as well.
    engine
        .create_catalog_entry(CatalogKind::Category, "Marketing", true)
        .await
        .unwrap();
    let patch = CatalogPatch {
        name: Some("marketing".to_string()),
        is_active: Some(true),
    };
    engine
        .update_catalog_entry(CatalogKind::Category, category.id, &patch)
        .await
        .unwrap_err();
    let current = engine
        .catalog_entry(CatalogKind::Category, category.id)
        .await
        .unwrap();
    assert!(!current.is_active);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .catalog_entry(CatalogKind::Category, 42)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .deactivate_catalog_entry(CatalogKind::Status, 42)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .rename_catalog_entry(CatalogKind::TransactionType, 42, "Income")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn list_filters_and_orders_by_name() {
    let (engine, _db) = engine_with_db().await;

    for name in ["Taxes", "Business", "Personal"] {
        engine
            .create_catalog_entry(CatalogKind::Status, name, true)
            .await
            .unwrap();
    }
    let personal = engine
        .list_catalog_entries(
            CatalogKind::Status,
            &CatalogListFilter {
                search: Some("PERS".to_string()),
                ..CatalogListFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(personal.total_count, 1);
    engine
        .deactivate_catalog_entry(CatalogKind::Status, personal.items[0].id)
        .await
        .unwrap();

    let all = engine
        .list_catalog_entries(CatalogKind::Status, &CatalogListFilter::default(), FIRST_PAGE)
        .await
        .unwrap();
    let names: Vec<_> = all.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Business", "Personal", "Taxes"]);

    let active_only = engine
        .list_catalog_entries(
            CatalogKind::Status,
            &CatalogListFilter {
                is_active: Some(true),
                ..CatalogListFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(active_only.total_count, 2);

    let choices = engine
        .active_catalog_entries(CatalogKind::Status)
        .await
        .unwrap();
    let names: Vec<_> = choices.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Business", "Taxes"]);
}

#[tokio::test]
async fn list_is_paginated() {
    let (engine, _db) = engine_with_db().await;

    for i in 0..5 {
        engine
            .create_catalog_entry(CatalogKind::Category, &format!("Category {i}"), true)
            .await
            .unwrap();
    }
    let request = engine.page_request(Some(2), Some(2)).unwrap();
    let page = engine
        .list_catalog_entries(CatalogKind::Category, &CatalogListFilter::default(), request)
        .await
        .unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.num_pages(), 3);
    let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Category 2", "Category 3"]);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let (engine, _db) = engine_with_db().await;

    for name in ["Business", "50% off", "snake_case"] {
        engine
            .create_catalog_entry(CatalogKind::Status, name, true)
            .await
            .unwrap();
    }

    for (term, expected) in [("%", "50% off"), ("_", "snake_case")] {
        let filter = CatalogListFilter {
            is_active: None,
            search: Some(term.to_string()),
        };
        let page = engine
            .list_catalog_entries(CatalogKind::Status, &filter, FIRST_PAGE)
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "search {term:?}");
        assert_eq!(page.items[0].name, expected);
    }
}
