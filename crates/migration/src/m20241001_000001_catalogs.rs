//! Reference catalogs.
//!
//! - `statuses`, `transaction_types`, `categories`: flat, soft-deletable
//!   lookup tables sharing one shape
//! - `subcategories`: scoped to a category, unique by name within it
//!
//! Names are unique case-insensitively through the `name_norm` column.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Columns shared by the flat catalogs.
#[derive(Iden)]
enum Catalog {
    Id,
    Name,
    NameNorm,
    CreatedAt,
    IsActive,
}

#[derive(Iden)]
enum Statuses {
    Table,
}

#[derive(Iden)]
enum TransactionTypes {
    Table,
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
    CategoryId,
    Name,
    NameNorm,
    CreatedAt,
    IsActive,
}

fn catalog_table<T>(table: T) -> TableCreateStatement
where
    T: Iden + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Catalog::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Catalog::Name).string_len(100).not_null())
        .col(ColumnDef::new(Catalog::NameNorm).string().not_null())
        .col(ColumnDef::new(Catalog::CreatedAt).timestamp().not_null())
        .col(
            ColumnDef::new(Catalog::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .to_owned()
}

fn name_norm_index<T>(name: &str, table: T) -> IndexCreateStatement
where
    T: Iden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(Catalog::NameNorm)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(catalog_table(Statuses::Table)).await?;
        manager
            .create_index(name_norm_index(
                "idx-statuses-name_norm-unique",
                Statuses::Table,
            ))
            .await?;

        manager
            .create_table(catalog_table(TransactionTypes::Table))
            .await?;
        manager
            .create_index(name_norm_index(
                "idx-transaction_types-name_norm-unique",
                TransactionTypes::Table,
            ))
            .await?;

        manager
            .create_table(catalog_table(Categories::Table))
            .await?;
        manager
            .create_index(name_norm_index(
                "idx-categories-name_norm-unique",
                Categories::Table,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subcategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subcategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subcategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subcategories::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subcategories::NameNorm).string().not_null())
                    .col(
                        ColumnDef::new(Subcategories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subcategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subcategories-category_id")
                            .from(Subcategories::Table, Subcategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-subcategories-category_id-name_norm-unique")
                    .table(Subcategories::Table)
                    .col(Subcategories::CategoryId)
                    .col(Subcategories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subcategories reference categories, so they go first.
        manager
            .drop_table(Table::drop().table(Subcategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Statuses::Table).to_owned())
            .await?;
        Ok(())
    }
}
