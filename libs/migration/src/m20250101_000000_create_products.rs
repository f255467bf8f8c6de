use sea_orm_migration::sea_orm::DbBackend;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite's NUMERIC affinity turns whole prices into INTEGER, which the
        // driver will not decode as a decimal; REAL affinity keeps them floats.
        let price = match manager.get_database_backend() {
            DbBackend::Sqlite => double(Products::Price),
            _ => decimal_len(Products::Price, 18, 2),
        };

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string(Products::Name))
                    .col(text(Products::Description))
                    .col(price)
                    .col(boolean(Products::IsAvailable).default(false))
                    .to_owned(),
            )
            .await?;

        // Backs the available-products listing
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_is_available")
                    .table(Products::Table)
                    .col(Products::IsAvailable)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    IsAvailable,
}
