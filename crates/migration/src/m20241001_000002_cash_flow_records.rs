//! Cash-flow records.
//!
//! Every reference uses `ON DELETE RESTRICT`: catalog rows are retired by
//! clearing `is_active`, never removed while records point at them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CashFlowRecords {
    Table,
    Id,
    StatusId,
    TransactionTypeId,
    CategoryId,
    SubcategoryId,
    AmountMinor,
    Comment,
    CommentNorm,
    CreatedAt,
    UpdatedAt,
    IsActive,
}

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
}

#[derive(Iden)]
enum TransactionTypes {
    Table,
    Id,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum Subcategories {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashFlowRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashFlowRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::StatusId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::TransactionTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::SubcategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::CommentNorm)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlowRecords::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flow_records-status_id")
                            .from(CashFlowRecords::Table, CashFlowRecords::StatusId)
                            .to(Statuses::Table, Statuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flow_records-transaction_type_id")
                            .from(CashFlowRecords::Table, CashFlowRecords::TransactionTypeId)
                            .to(TransactionTypes::Table, TransactionTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flow_records-category_id")
                            .from(CashFlowRecords::Table, CashFlowRecords::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flow_records-subcategory_id")
                            .from(CashFlowRecords::Table, CashFlowRecords::SubcategoryId)
                            .to(Subcategories::Table, Subcategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_flow_records-created_at")
                    .table(CashFlowRecords::Table)
                    .col(CashFlowRecords::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_flow_records-category_id-subcategory_id")
                    .table(CashFlowRecords::Table)
                    .col(CashFlowRecords::CategoryId)
                    .col(CashFlowRecords::SubcategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashFlowRecords::Table).to_owned())
            .await?;
        Ok(())
    }
}
