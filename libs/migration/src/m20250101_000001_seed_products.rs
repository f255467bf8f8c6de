use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO products (id, name, description, price, is_available)
            VALUES
                (1, 'Product 1', 'Description 1', 10.00, TRUE),
                (2, 'Product 2', 'Description 2', 20.00, TRUE),
                (3, 'Product 3', 'Description 3', 30.00, FALSE)
            "#,
        )
        .await?;

        // Explicit ids do not advance the serial sequence on PostgreSQL
        if manager.get_database_backend() == DbBackend::Postgres {
            db.execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('products', 'id'), (SELECT MAX(id) FROM products))",
            )
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM products WHERE id IN (1, 2, 3)")
            .await?;

        Ok(())
    }
}
