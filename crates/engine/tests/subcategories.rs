use sea_orm::{ConnectionTrait, Statement};

use engine::{
    CatalogKind, EngineError, PageRequest, SubcategoryListFilter, SubcategoryPatch, ValidationCode,
};

mod common;

use common::{engine_with_db, seed};

#[tokio::test]
async fn create_in_active_category() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let detail = engine
        .create_subcategory(fixture.marketing, " Farpost ", true)
        .await
        .unwrap();
    assert_eq!(detail.subcategory.name, "Farpost");
    assert_eq!(detail.subcategory.category_id, fixture.marketing);
    assert_eq!(detail.category.name, "Marketing");
    assert!(detail.subcategory.is_active);

    let fetched = engine.subcategory(detail.subcategory.id).await.unwrap();
    assert_eq!(fetched, detail);
}

#[tokio::test]
async fn create_can_start_inactive() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let detail = engine
        .create_subcategory(fixture.marketing, "Billboards", false)
        .await
        .unwrap();
    assert!(!detail.subcategory.is_active);

    let choices = engine
        .subcategories_by_category(fixture.marketing)
        .await
        .unwrap();
    assert!(choices.iter().all(|item| item.id != detail.subcategory.id));
}

#[tokio::test]
async fn create_fails_for_missing_category() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_subcategory(999, "Avito", true).await.unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::ReferenceNotFound));
    assert_eq!(err.validation().unwrap().field, "category_id");
}

#[tokio::test]
async fn create_fails_for_inactive_category() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    engine
        .deactivate_catalog_entry(CatalogKind::Category, fixture.marketing)
        .await
        .unwrap();
    let err = engine
        .create_subcategory(fixture.marketing, "Farpost", true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::CategoryInactive));
}

#[tokio::test]
async fn name_is_checked_before_category() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_subcategory(999, "  ", true).await.unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::EmptyName));
}

#[tokio::test]
async fn names_are_unique_per_category() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let err = engine
        .create_subcategory(fixture.marketing, "avito", true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::DuplicateNameInCategory));

    // The same name is fine under another category.
    engine
        .create_subcategory(fixture.infrastructure, "Avito", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn reparent_requires_active_unique_target() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let move_to_infra = SubcategoryPatch {
        category_id: Some(fixture.infrastructure),
        ..SubcategoryPatch::default()
    };

    engine
        .create_subcategory(fixture.infrastructure, "Avito", true)
        .await
        .unwrap();
    let err = engine
        .update_subcategory(fixture.avito, &move_to_infra)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::DuplicateNameInCategory));

    let rename_and_move = SubcategoryPatch {
        category_id: Some(fixture.infrastructure),
        name: Some("Servers".to_string()),
        is_active: None,
    };
    let moved = engine
        .update_subcategory(fixture.avito, &rename_and_move)
        .await
        .unwrap();
    assert_eq!(moved.category.id, fixture.infrastructure);
    assert_eq!(moved.subcategory.name, "Servers");

    engine
        .deactivate_catalog_entry(CatalogKind::Category, fixture.marketing)
        .await
        .unwrap();
    let back = SubcategoryPatch {
        category_id: Some(fixture.marketing),
        ..SubcategoryPatch::default()
    };
    let err = engine
        .update_subcategory(fixture.avito, &back)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ValidationCode::CategoryInactive));
}

#[tokio::test]
async fn rename_under_inactive_parent_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    engine
        .deactivate_catalog_entry(CatalogKind::Category, fixture.marketing)
        .await
        .unwrap();
    let patch = SubcategoryPatch {
        name: Some("Avito ads".to_string()),
        ..SubcategoryPatch::default()
    };
    let renamed = engine.update_subcategory(fixture.avito, &patch).await.unwrap();
    assert_eq!(renamed.subcategory.name, "Avito ads");
    assert!(!renamed.category.is_active);
}

#[tokio::test]
async fn deactivate_leaves_parent_alone() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let first = engine.deactivate_subcategory(fixture.avito).await.unwrap();
    let second = engine.deactivate_subcategory(fixture.avito).await.unwrap();
    assert!(!first.subcategory.is_active);
    assert_eq!(first, second);

    let category = engine
        .catalog_entry(CatalogKind::Category, fixture.marketing)
        .await
        .unwrap();
    assert!(category.is_active);

    let restored = engine.activate_subcategory(fixture.avito).await.unwrap();
    assert!(restored.subcategory.is_active);
}

#[tokio::test]
async fn by_category_returns_active_children() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let farpost = engine
        .create_subcategory(fixture.marketing, "Farpost", true)
        .await
        .unwrap();
    engine
        .deactivate_subcategory(farpost.subcategory.id)
        .await
        .unwrap();

    let children = engine
        .subcategories_by_category(fixture.marketing)
        .await
        .unwrap();
    let names: Vec<_> = children.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Avito"]);

    let empty = engine.subcategories_by_category(999).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn list_orders_by_category_then_name() {
    let (engine, _db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    engine
        .create_subcategory(fixture.infrastructure, "Hosting", true)
        .await
        .unwrap();
    engine
        .create_subcategory(fixture.marketing, "Ads", true)
        .await
        .unwrap();

    let request = PageRequest {
        page: 1,
        page_size: 20,
    };
    let page = engine
        .list_subcategories(&SubcategoryListFilter::default(), request)
        .await
        .unwrap();
    let rows: Vec<_> = page
        .items
        .iter()
        .map(|d| (d.category.name.as_str(), d.subcategory.name.as_str()))
        .collect();
    assert_eq!(
        rows,
        [
            ("Infrastructure", "Hosting"),
            ("Infrastructure", "VPS"),
            ("Marketing", "Ads"),
            ("Marketing", "Avito"),
        ]
    );

    let filter = SubcategoryListFilter {
        category_id: Some(fixture.marketing),
        search: Some("avi".to_string()),
        ..SubcategoryListFilter::default()
    };
    let page = engine.list_subcategories(&filter, request).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].subcategory.id, fixture.avito);
}

#[tokio::test]
async fn unknown_subcategory_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.subcategory(7).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.deactivate_subcategory(7).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn store_refuses_to_delete_referenced_category() {
    let (engine, db) = engine_with_db().await;
    let fixture = seed(&engine).await;

    let backend = db.get_database_backend();
    let result = db
        .execute(Statement::from_sql_and_values(
            backend,
            "DELETE FROM categories WHERE id = ?",
            vec![fixture.marketing.into()],
        ))
        .await;
    assert!(result.is_err());
}
