#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Amount, CashFlowRecordDetail, CatalogKind, Engine, EngineConfig, RecordCandidate,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_config(EngineConfig::default()).await
}

pub async fn engine_with_config(config: EngineConfig) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .config(config)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Ids of a small, fully active reference set.
#[derive(Clone, Copy, Debug)]
pub struct Fixture {
    pub business: i32,
    pub expense: i32,
    pub marketing: i32,
    pub infrastructure: i32,
    /// "Avito", under Marketing.
    pub avito: i32,
    /// "VPS", under Infrastructure.
    pub vps: i32,
}

impl Fixture {
    pub fn candidate(&self, amount: &str) -> RecordCandidate {
        RecordCandidate {
            status_id: self.business,
            transaction_type_id: self.expense,
            category_id: self.marketing,
            subcategory_id: self.avito,
            amount: amount.parse::<Amount>().unwrap(),
            comment: None,
        }
    }
}

pub async fn seed(engine: &Engine) -> Fixture {
    let business = engine
        .create_catalog_entry(CatalogKind::Status, "Business", true)
        .await
        .unwrap();
    let expense = engine
        .create_catalog_entry(CatalogKind::TransactionType, "Expense", true)
        .await
        .unwrap();
    let marketing = engine
        .create_catalog_entry(CatalogKind::Category, "Marketing", true)
        .await
        .unwrap();
    let infrastructure = engine
        .create_catalog_entry(CatalogKind::Category, "Infrastructure", true)
        .await
        .unwrap();
    let avito = engine
        .create_subcategory(marketing.id, "Avito", true)
        .await
        .unwrap();
    let vps = engine
        .create_subcategory(infrastructure.id, "VPS", true)
        .await
        .unwrap();

    Fixture {
        business: business.id,
        expense: expense.id,
        marketing: marketing.id,
        infrastructure: infrastructure.id,
        avito: avito.subcategory.id,
        vps: vps.subcategory.id,
    }
}

pub async fn submit(engine: &Engine, fixture: &Fixture, amount: &str) -> CashFlowRecordDetail {
    engine
        .submit_record(&fixture.candidate(amount))
        .await
        .unwrap()
}

/// Backdate a record, bypassing the engine.
pub async fn set_created_at(db: &DatabaseConnection, id: i32, created_at: DateTime<Utc>) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE cash_flow_records SET created_at = ? WHERE id = ?",
        vec![created_at.into(), id.into()],
    ))
    .await
    .unwrap();
}
